//! Note tools. Notes use offset pagination and attach to exactly one entity.

use serde_json::{json, Value};
use tracing::debug;

use pipedrive_client::models::note::{NoteContent, DEFAULT_NOTE_PAGE_LIMIT};
use pipedrive_client::{
    NewNote, NoteEntity, NoteListParams, NoteRefs, NoteTarget, NoteUpdate, PipedriveClient,
};

use super::helpers::{found, non_blank, optional_id, parse_enum, require_id, ToolResult};
use super::params::{EntityIdParams, NoteCreateParams, NoteListToolParams, NoteUpdateParams};

/// Offset page as returned by the note and comment list tools.
pub(crate) fn offset_page(key: &str, items: Vec<Value>, has_more: bool, start: i64, limit: i64) -> Value {
    let count = items.len();
    json!({
        key: items,
        "count": count,
        "has_more": has_more,
        "pagination": {
            "start": start,
            "limit": limit,
            "has_more": has_more,
        },
    })
}

fn note_refs(
    lead_id: Option<&str>,
    deal_id: Option<&str>,
    person_id: Option<&str>,
    org_id: Option<&str>,
    project_id: Option<&str>,
) -> ToolResult<NoteRefs> {
    Ok(NoteRefs {
        lead_id: non_blank(lead_id),
        deal_id: optional_id(deal_id, "deal_id")?,
        person_id: optional_id(person_id, "person_id")?,
        org_id: optional_id(org_id, "org_id")?,
        project_id: optional_id(project_id, "project_id")?,
    })
}

// ── note_create ──

pub async fn note_create(client: &PipedriveClient, params: NoteCreateParams) -> ToolResult<Value> {
    let refs = note_refs(
        params.lead_id.as_deref(),
        params.deal_id.as_deref(),
        params.person_id.as_deref(),
        params.org_id.as_deref(),
        params.project_id.as_deref(),
    )?;
    let target = NoteTarget::from_refs(&refs)?;

    let note = NewNote {
        user_id: optional_id(params.user_id.as_deref(), "user_id")?,
        pinned: params.pinned,
        ..NewNote::new(params.content, target)
    };
    Ok(client.create_note(&note).await?)
}

// ── note_get ──

pub async fn note_get(client: &PipedriveClient, params: EntityIdParams) -> ToolResult<Value> {
    let id = require_id(&params.id, "id")?;
    let note = client.get_note(id).await?;
    found("Note", id, note)
}

// ── note_update ──

pub async fn note_update(client: &PipedriveClient, params: NoteUpdateParams) -> ToolResult<Value> {
    let id = require_id(&params.id, "id")?;
    let refs = note_refs(
        params.lead_id.as_deref(),
        params.deal_id.as_deref(),
        params.person_id.as_deref(),
        params.org_id.as_deref(),
        params.project_id.as_deref(),
    )?;
    let target = NoteTarget::at_most_one(&refs)?;
    if let Some(raw) = params.content.as_deref() {
        NoteContent::parse(raw)?;
    }

    // Pinning without re-attaching targets the entity the note already has.
    let pin_entity = match (&target, params.pinned) {
        (None, Some(_)) => {
            let existing = client.get_note(id).await?;
            let entity = NoteEntity::attached_to(&existing);
            debug!(note_id = id, entity = ?entity, "Resolved pin target from existing note");
            entity
        }
        _ => None,
    };

    let update = NoteUpdate {
        content: params.content,
        target,
        pinned: params.pinned,
        pin_entity,
    };
    Ok(client.update_note(id, &update).await?)
}

// ── note_delete ──

pub async fn note_delete(client: &PipedriveClient, params: EntityIdParams) -> ToolResult<Value> {
    let id = require_id(&params.id, "id")?;
    Ok(client.delete_note(id).await?)
}

// ── note_list ──

pub async fn note_list(client: &PipedriveClient, params: NoteListToolParams) -> ToolResult<Value> {
    let lead_id = non_blank(params.lead_id.as_deref());
    let deal_id = optional_id(params.deal_id.as_deref(), "deal_id")?;
    let person_id = optional_id(params.person_id.as_deref(), "person_id")?;
    let org_id = optional_id(params.org_id.as_deref(), "org_id")?;

    // The pin filter follows the most specific entity filter given.
    let pinned_to = if params.pinned_only.unwrap_or(false) {
        if lead_id.is_some() {
            Some(NoteEntity::Lead)
        } else if deal_id.is_some() {
            Some(NoteEntity::Deal)
        } else if person_id.is_some() {
            Some(NoteEntity::Person)
        } else if org_id.is_some() {
            Some(NoteEntity::Organization)
        } else {
            None
        }
    } else {
        None
    };

    let query = NoteListParams {
        user_id: optional_id(params.user_id.as_deref(), "user_id")?,
        deal_id,
        person_id,
        org_id,
        lead_id,
        pinned_to,
        start: params.start.unwrap_or(0),
        limit: params.limit.unwrap_or(DEFAULT_NOTE_PAGE_LIMIT),
        sort: parse_enum(params.sort.as_deref())?,
        start_date: non_blank(params.start_date.as_deref()),
        end_date: non_blank(params.end_date.as_deref()),
    };
    let page = client.list_notes(&query).await?;
    Ok(offset_page(
        "notes",
        page.items,
        page.has_more,
        query.start,
        query.limit,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::helpers::ToolError;
    use pipedrive_client::testing::MockTransport;
    use pipedrive_client::ClientError;
    use std::sync::Arc;

    fn client(transport: &Arc<MockTransport>) -> PipedriveClient {
        PipedriveClient::with_transport(transport.clone())
    }

    #[tokio::test]
    async fn test_create_requires_exactly_one_entity() {
        let transport = MockTransport::new();
        let none = NoteCreateParams {
            content: "<p>hi</p>".into(),
            ..NoteCreateParams::default()
        };
        let err = note_create(&client(&transport), none).await.unwrap_err();
        assert!(err.to_string().contains("exactly one entity"));

        let two = NoteCreateParams {
            content: "<p>hi</p>".into(),
            deal_id: Some("1".into()),
            person_id: Some("2".into()),
            ..NoteCreateParams::default()
        };
        let err = note_create(&client(&transport), two).await.unwrap_err();
        assert!(err.to_string().contains("one entity at a time"));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_create_on_lead_keeps_uuid_and_pins() {
        let transport = MockTransport::new();
        transport.push_json(json!({"success": true, "data": {"id": 4}}));
        let params = NoteCreateParams {
            content: "<p>call back</p>".into(),
            lead_id: Some("adf21080-0e10-11eb-879b-05d71fb426ec".into()),
            pinned: Some(true),
            ..NoteCreateParams::default()
        };
        note_create(&client(&transport), params).await.unwrap();

        let body = transport.last_request().unwrap().body.unwrap();
        assert_eq!(body["lead_id"], json!("adf21080-0e10-11eb-879b-05d71fb426ec"));
        assert_eq!(body["pinned_to_lead_flag"], json!(1));
    }

    #[tokio::test]
    async fn test_update_pin_uses_existing_attachment() {
        let transport = MockTransport::new();
        transport
            .push_json(json!({"success": true, "data": {"id": 6, "deal_id": 40, "person_id": null}}))
            .push_json(json!({"success": true, "data": {"id": 6}}));
        let params = NoteUpdateParams {
            id: "6".into(),
            pinned: Some(true),
            ..NoteUpdateParams::default()
        };
        note_update(&client(&transport), params).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].path, "/notes/6");
        let body = requests[1].body.clone().unwrap();
        assert_eq!(body, json!({"pinned_to_deal_flag": 1}));
    }

    #[tokio::test]
    async fn test_update_pin_with_unknown_attachment_fails() {
        let transport = MockTransport::new();
        transport.push_json(json!({"success": true, "data": {"id": 6}}));
        let params = NoteUpdateParams {
            id: "6".into(),
            pinned: Some(false),
            ..NoteUpdateParams::default()
        };
        let err = note_update(&client(&transport), params).await.unwrap_err();
        assert!(matches!(
            err,
            ToolError::Client(ClientError::Validation(ref v)) if v.field == "pinned"
        ));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_update_pin_checks_content_before_lookup() {
        let transport = MockTransport::new();
        let blank = NoteUpdateParams {
            id: "6".into(),
            content: Some("   ".into()),
            pinned: Some(true),
            ..NoteUpdateParams::default()
        };
        let err = note_update(&client(&transport), blank).await.unwrap_err();
        assert!(matches!(
            err,
            ToolError::Client(ClientError::Validation(ref v)) if v.field == "content"
        ));

        let oversized = NoteUpdateParams {
            id: "6".into(),
            content: Some("x".repeat(100_001)),
            pinned: Some(true),
            ..NoteUpdateParams::default()
        };
        let err = note_update(&client(&transport), oversized).await.unwrap_err();
        assert!(err.to_string().contains("exceeds maximum size"));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_update_pin_with_content_looks_up_then_updates() {
        let transport = MockTransport::new();
        transport
            .push_json(json!({"success": true, "data": {"id": 6, "org_id": 9}}))
            .push_json(json!({"success": true, "data": {"id": 6}}));
        let params = NoteUpdateParams {
            id: "6".into(),
            content: Some("<p>revised</p>".into()),
            pinned: Some(true),
            ..NoteUpdateParams::default()
        };
        note_update(&client(&transport), params).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method.as_str(), "GET");
        assert_eq!(requests[1].method.as_str(), "PUT");
        assert_eq!(
            requests[1].body.clone().unwrap(),
            json!({"content": "<p>revised</p>", "pinned_to_organization_flag": 1})
        );
    }

    #[tokio::test]
    async fn test_get_missing_note() {
        let transport = MockTransport::new();
        transport.push_json(json!({"success": true}));
        let err = note_get(&client(&transport), EntityIdParams { id: "12".into() })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Note with ID 12 not found");
    }

    #[tokio::test]
    async fn test_list_pinned_only_follows_entity_filter() {
        let transport = MockTransport::new();
        transport.push_json(json!({
            "success": true,
            "data": [{"id": 1}],
            "additional_data": {"pagination": {"more_items_in_collection": true}}
        }));
        let params = NoteListToolParams {
            deal_id: Some("40".into()),
            pinned_only: Some(true),
            limit: Some(1),
            ..NoteListToolParams::default()
        };
        let out = note_list(&client(&transport), params).await.unwrap();
        assert_eq!(out["count"], json!(1));
        assert_eq!(out["has_more"], json!(true));
        assert_eq!(out["pagination"], json!({"start": 0, "limit": 1, "has_more": true}));

        let request = transport.last_request().unwrap();
        assert_eq!(request.query.get("pinned_to_deal_flag"), Some("1"));
    }

    #[tokio::test]
    async fn test_list_rejects_out_of_range_limit() {
        let transport = MockTransport::new();
        let params = NoteListToolParams {
            limit: Some(501),
            ..NoteListToolParams::default()
        };
        assert!(note_list(&client(&transport), params).await.is_err());
        assert_eq!(transport.request_count(), 0);
    }
}
