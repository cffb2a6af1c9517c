//! Note request models.
//!
//! A note hangs off exactly one parent entity. [`NoteTarget`] makes that a
//! type: it is built from the five optional references and refuses zero or
//! several. Pinning is expressed against the target, so the pin flag sent
//! always matches the entity the note belongs to.

use std::fmt;

use serde_json::Value;

use crate::error::ValidationError;
use crate::payload::{Payload, QueryParams};
use crate::validation::{self, NoteSort};

/// Largest accepted note body, in UTF-8 bytes.
pub const MAX_NOTE_CONTENT_BYTES: usize = 100_000;

/// Default page size for note listings.
pub const DEFAULT_NOTE_PAGE_LIMIT: i64 = 100;

/// Kind of entity a note can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteEntity {
    Lead,
    Deal,
    Person,
    Organization,
    Project,
}

impl NoteEntity {
    pub const ALL: &'static [NoteEntity] = &[
        NoteEntity::Lead,
        NoteEntity::Deal,
        NoteEntity::Person,
        NoteEntity::Organization,
        NoteEntity::Project,
    ];

    /// Reference field carrying the parent id.
    pub fn id_field(&self) -> &'static str {
        match self {
            NoteEntity::Lead => "lead_id",
            NoteEntity::Deal => "deal_id",
            NoteEntity::Person => "person_id",
            NoteEntity::Organization => "org_id",
            NoteEntity::Project => "project_id",
        }
    }

    /// Flag pinning the note to the top of the parent's timeline.
    pub fn pin_flag(&self) -> &'static str {
        match self {
            NoteEntity::Lead => "pinned_to_lead_flag",
            NoteEntity::Deal => "pinned_to_deal_flag",
            NoteEntity::Person => "pinned_to_person_flag",
            NoteEntity::Organization => "pinned_to_organization_flag",
            NoteEntity::Project => "pinned_to_project_flag",
        }
    }

    /// Which entity an existing note (as returned by the API) belongs to.
    pub fn attached_to(note: &Value) -> Option<NoteEntity> {
        NoteEntity::ALL.iter().copied().find(|entity| {
            note.get(entity.id_field())
                .is_some_and(|id| !id.is_null() && id != &Value::from(0))
        })
    }
}

impl fmt::Display for NoteEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NoteEntity::Lead => "lead",
            NoteEntity::Deal => "deal",
            NoteEntity::Person => "person",
            NoteEntity::Organization => "organization",
            NoteEntity::Project => "project",
        };
        f.write_str(name)
    }
}

/// The single parent of a note. Leads are addressed by UUID, the rest by integer id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteTarget {
    Lead(String),
    Deal(i64),
    Person(i64),
    Organization(i64),
    Project(i64),
}

/// The five optional parent references as callers supply them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteRefs {
    pub lead_id: Option<String>,
    pub deal_id: Option<i64>,
    pub person_id: Option<i64>,
    pub org_id: Option<i64>,
    pub project_id: Option<i64>,
}

impl NoteRefs {
    fn targets(&self) -> Vec<NoteTarget> {
        let mut targets = Vec::new();
        if let Some(lead) = &self.lead_id {
            targets.push(NoteTarget::Lead(lead.clone()));
        }
        if let Some(id) = self.deal_id {
            targets.push(NoteTarget::Deal(id));
        }
        if let Some(id) = self.person_id {
            targets.push(NoteTarget::Person(id));
        }
        if let Some(id) = self.org_id {
            targets.push(NoteTarget::Organization(id));
        }
        if let Some(id) = self.project_id {
            targets.push(NoteTarget::Project(id));
        }
        targets
    }
}

impl NoteTarget {
    /// Exactly one reference must be set.
    pub fn from_refs(refs: &NoteRefs) -> Result<NoteTarget, ValidationError> {
        match Self::at_most_one(refs)? {
            Some(target) => Ok(target),
            None => Err(ValidationError::new(
                "entity",
                "Note must be attached to exactly one entity (lead_id, deal_id, person_id, org_id, or project_id)",
            )),
        }
    }

    /// Zero or one reference; used when re-attaching is optional.
    pub fn at_most_one(refs: &NoteRefs) -> Result<Option<NoteTarget>, ValidationError> {
        let mut targets = refs.targets();
        if targets.len() > 1 {
            return Err(ValidationError::new(
                "entity",
                "Note can only be attached to one entity at a time",
            ));
        }
        Ok(targets.pop())
    }

    pub fn entity(&self) -> NoteEntity {
        match self {
            NoteTarget::Lead(_) => NoteEntity::Lead,
            NoteTarget::Deal(_) => NoteEntity::Deal,
            NoteTarget::Person(_) => NoteEntity::Person,
            NoteTarget::Organization(_) => NoteEntity::Organization,
            NoteTarget::Project(_) => NoteEntity::Project,
        }
    }

    fn id_value(&self) -> Value {
        match self {
            NoteTarget::Lead(uuid) => Value::from(uuid.as_str()),
            NoteTarget::Deal(id)
            | NoteTarget::Person(id)
            | NoteTarget::Organization(id)
            | NoteTarget::Project(id) => Value::from(*id),
        }
    }

    fn write_to(&self, payload: &mut Payload) {
        payload.insert(self.entity().id_field(), self.id_value());
    }
}

/// Validated HTML note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteContent(String);

impl NoteContent {
    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let content = raw.into();
        if content.trim().is_empty() {
            return Err(ValidationError::new("content", "Note content cannot be empty"));
        }
        let size = content.len();
        if size > MAX_NOTE_CONTENT_BYTES {
            return Err(ValidationError::new(
                "content",
                format!(
                    "Note content exceeds maximum size of 100KB (current: {size} bytes)"
                ),
            ));
        }
        Ok(Self(content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn pin_value(pinned: bool) -> i64 {
    i64::from(pinned)
}

/// Fields for creating a note.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    pub content: String,
    pub target: NoteTarget,
    pub user_id: Option<i64>,
    /// Pin to the target entity
    pub pinned: Option<bool>,
}

impl NewNote {
    pub fn new(content: impl Into<String>, target: NoteTarget) -> Self {
        Self {
            content: content.into(),
            target,
            user_id: None,
            pinned: None,
        }
    }

    pub fn build_payload(&self) -> Result<Payload, ValidationError> {
        let content = NoteContent::parse(self.content.as_str())?;

        let mut payload = Payload::new();
        payload.insert("content", content.as_str());
        self.target.write_to(&mut payload);
        payload.insert_opt("user_id", self.user_id);
        if let Some(pinned) = self.pinned {
            payload.insert(self.target.entity().pin_flag(), pin_value(pinned));
        }
        Ok(payload)
    }
}

/// Partial update of a note.
///
/// `pinned` applies to `target` when the note is being re-attached, otherwise
/// to `pin_entity`, the entity the note is already attached to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteUpdate {
    pub content: Option<String>,
    pub target: Option<NoteTarget>,
    pub pinned: Option<bool>,
    pub pin_entity: Option<NoteEntity>,
}

impl NoteUpdate {
    pub fn build_payload(&self) -> Result<Payload, ValidationError> {
        let mut payload = Payload::new();
        if let Some(raw) = &self.content {
            let content = NoteContent::parse(raw.as_str())?;
            payload.insert("content", content.as_str());
        }
        if let Some(target) = &self.target {
            target.write_to(&mut payload);
        }
        if let Some(pinned) = self.pinned {
            let entity = self
                .target
                .as_ref()
                .map(NoteTarget::entity)
                .or(self.pin_entity)
                .ok_or_else(|| {
                    ValidationError::new(
                        "pinned",
                        "Cannot change pinning without knowing which entity the note is attached to",
                    )
                })?;
            payload.insert(entity.pin_flag(), pin_value(pinned));
        }

        if payload.is_empty() {
            return Err(ValidationError::new(
                "payload",
                "At least one field must be provided for update",
            ));
        }
        Ok(payload)
    }
}

/// Filters and offset paging for `GET /notes`.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteListParams {
    pub user_id: Option<i64>,
    pub deal_id: Option<i64>,
    pub person_id: Option<i64>,
    pub org_id: Option<i64>,
    pub lead_id: Option<String>,
    /// Restrict to notes pinned to this entity kind
    pub pinned_to: Option<NoteEntity>,
    pub start: i64,
    pub limit: i64,
    pub sort: Option<NoteSort>,
    /// `YYYY-MM-DD`
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl Default for NoteListParams {
    fn default() -> Self {
        Self {
            user_id: None,
            deal_id: None,
            person_id: None,
            org_id: None,
            lead_id: None,
            pinned_to: None,
            start: 0,
            limit: DEFAULT_NOTE_PAGE_LIMIT,
            sort: None,
            start_date: None,
            end_date: None,
        }
    }
}

impl NoteListParams {
    pub fn build_query(&self) -> Result<QueryParams, ValidationError> {
        validation::page_start(self.start)?;
        validation::page_limit(self.limit)?;
        if let Some(date) = &self.start_date {
            validation::iso_date("start_date", date)?;
        }
        if let Some(date) = &self.end_date {
            validation::iso_date("end_date", date)?;
        }

        let mut query = QueryParams::new();
        query.push("start", self.start);
        query.push("limit", self.limit);
        query.push_opt("user_id", self.user_id);
        query.push_opt("deal_id", self.deal_id);
        query.push_opt("person_id", self.person_id);
        query.push_opt("org_id", self.org_id);
        query.push_opt("lead_id", self.lead_id.as_deref());
        if let Some(entity) = self.pinned_to {
            query.push(entity.pin_flag(), 1);
        }
        query.push_opt("sort", self.sort);
        query.push_opt("start_date", self.start_date.as_deref());
        query.push_opt("end_date", self.end_date.as_deref());
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn refs() -> NoteRefs {
        NoteRefs::default()
    }

    #[test]
    fn test_target_requires_exactly_one_reference() {
        let err = NoteTarget::from_refs(&refs()).unwrap_err();
        assert!(err.message.contains("must be attached to exactly one entity"));

        let two = NoteRefs {
            deal_id: Some(1),
            person_id: Some(2),
            ..refs()
        };
        let err = NoteTarget::from_refs(&two).unwrap_err();
        assert!(err.message.contains("can only be attached to one entity"));

        let one = NoteRefs {
            org_id: Some(7),
            ..refs()
        };
        assert_eq!(NoteTarget::from_refs(&one).unwrap(), NoteTarget::Organization(7));
    }

    #[test]
    fn test_each_single_reference_is_accepted() {
        let cases = [
            (NoteRefs { lead_id: Some("a-b".into()), ..refs() }, NoteEntity::Lead),
            (NoteRefs { deal_id: Some(1), ..refs() }, NoteEntity::Deal),
            (NoteRefs { person_id: Some(1), ..refs() }, NoteEntity::Person),
            (NoteRefs { org_id: Some(1), ..refs() }, NoteEntity::Organization),
            (NoteRefs { project_id: Some(1), ..refs() }, NoteEntity::Project),
        ];
        for (refs, entity) in cases {
            assert_eq!(NoteTarget::from_refs(&refs).unwrap().entity(), entity);
        }
    }

    #[test]
    fn test_at_most_one_allows_none() {
        assert_eq!(NoteTarget::at_most_one(&refs()).unwrap(), None);
    }

    #[test]
    fn test_content_rules() {
        assert!(NoteContent::parse("   ").is_err());
        assert!(NoteContent::parse("<p>ok</p>").is_ok());
        assert!(NoteContent::parse("a".repeat(MAX_NOTE_CONTENT_BYTES)).is_ok());
        let err = NoteContent::parse("a".repeat(MAX_NOTE_CONTENT_BYTES + 1)).unwrap_err();
        assert!(err.message.contains("100KB"));
    }

    #[test]
    fn test_content_limit_counts_utf8_bytes() {
        // 'é' is two bytes, so 50_001 of them exceed the limit
        let content = "é".repeat(50_001);
        assert!(content.chars().count() < MAX_NOTE_CONTENT_BYTES);
        assert!(NoteContent::parse(content).is_err());
    }

    #[test]
    fn test_new_note_payload_with_pin() {
        let mut note = NewNote::new("<p>Call went well</p>", NoteTarget::Deal(42));
        note.pinned = Some(true);
        note.user_id = Some(5);
        assert_eq!(
            note.build_payload().unwrap().into_value(),
            json!({
                "content": "<p>Call went well</p>",
                "deal_id": 42,
                "user_id": 5,
                "pinned_to_deal_flag": 1
            })
        );
    }

    #[test]
    fn test_lead_target_keeps_uuid_string() {
        let note = NewNote::new("hi", NoteTarget::Lead("adf21080-0e10-11eb".into()));
        let payload = note.build_payload().unwrap();
        assert_eq!(payload.get("lead_id"), Some(&json!("adf21080-0e10-11eb")));
    }

    #[test]
    fn test_update_empty_fails() {
        let err = NoteUpdate::default().build_payload().unwrap_err();
        assert!(err.message.contains("At least one field"));
    }

    #[test]
    fn test_update_pin_uses_target_then_existing_entity() {
        let retarget = NoteUpdate {
            target: Some(NoteTarget::Person(9)),
            pinned: Some(false),
            ..NoteUpdate::default()
        };
        assert_eq!(
            retarget.build_payload().unwrap().into_value(),
            json!({"person_id": 9, "pinned_to_person_flag": 0})
        );

        let existing = NoteUpdate {
            pinned: Some(true),
            pin_entity: Some(NoteEntity::Organization),
            ..NoteUpdate::default()
        };
        assert_eq!(
            existing.build_payload().unwrap().into_value(),
            json!({"pinned_to_organization_flag": 1})
        );

        let unknown = NoteUpdate {
            pinned: Some(true),
            ..NoteUpdate::default()
        };
        assert_eq!(unknown.build_payload().unwrap_err().field, "pinned");
    }

    #[test]
    fn test_attached_to_reads_existing_note() {
        let note = json!({"id": 1, "deal_id": null, "person_id": 12, "org_id": null});
        assert_eq!(NoteEntity::attached_to(&note), Some(NoteEntity::Person));
        assert_eq!(NoteEntity::attached_to(&json!({"id": 1})), None);
    }

    #[test]
    fn test_list_query() {
        let params = NoteListParams {
            deal_id: Some(3),
            pinned_to: Some(NoteEntity::Deal),
            sort: Some(NoteSort::UpdateTimeDesc),
            start: 50,
            limit: 25,
            ..NoteListParams::default()
        };
        let query = params.build_query().unwrap();
        assert_eq!(query.get("start"), Some("50"));
        assert_eq!(query.get("limit"), Some("25"));
        assert_eq!(query.get("deal_id"), Some("3"));
        assert_eq!(query.get("pinned_to_deal_flag"), Some("1"));
        assert_eq!(query.get("sort"), Some("-update_time"));
        assert!(query.get("user_id").is_none());
    }

    #[test]
    fn test_list_query_bounds() {
        let negative = NoteListParams {
            start: -1,
            ..NoteListParams::default()
        };
        assert_eq!(negative.build_query().unwrap_err().field, "start");

        let too_many = NoteListParams {
            limit: 501,
            ..NoteListParams::default()
        };
        assert_eq!(too_many.build_query().unwrap_err().field, "limit");

        let bad_date = NoteListParams {
            start_date: Some("2025/01/01".into()),
            ..NoteListParams::default()
        };
        assert_eq!(bad_date.build_query().unwrap_err().field, "start_date");
    }
}
