//! Typed clients for the Pipedrive CRM REST API.
//!
//! The crate is layered bottom-up:
//!
//! - [`payload`] and [`validation`]: sparse request bodies, query strings and
//!   the wire enumerations with their range checks.
//! - [`models`]: per-entity request structs whose `build_payload` /
//!   `build_query` validate before anything is sent.
//! - [`transport`]: the [`Transport`] seam and its reqwest implementation.
//! - [`response`]: envelope unwrapping and the two page types,
//!   [`CursorPage`] and [`OffsetPage`].
//! - [`resources`]: one client per entity.
//! - [`PipedriveClient`]: the aggregate over a shared transport.
//!
//! ```no_run
//! use pipedrive_client::{ClientConfig, DealListParams, PipedriveClient};
//!
//! # async fn run() -> pipedrive_client::ClientResult<()> {
//! let client = PipedriveClient::new(ClientConfig::new("api-token", "acme"))?;
//! let page = client.list_deals(&DealListParams::default()).await?;
//! if let Some(cursor) = page.next_cursor {
//!     let params = DealListParams {
//!         cursor: Some(cursor),
//!         ..DealListParams::default()
//!     };
//!     client.list_deals(&params).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod payload;
pub mod resources;
pub mod response;
pub mod transport;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use client::PipedriveClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ValidationError};
pub use models::{
    CommentBody, CommentListParams, DealListParams, DealProductUpdate, DealSearchParams,
    DealUpdate, NewDeal, NewDealProduct, NewNote, NoteEntity, NoteListParams, NoteRefs,
    NoteTarget, NoteUpdate, PipelineListParams, StageListParams, User,
};
pub use payload::{CustomFields, Payload, QueryParams};
pub use response::{ApiResponse, CursorPage, OffsetPage};
pub use transport::{ApiRequest, ApiVersion, HttpTransport, Transport};
pub use validation::{
    BillingFrequency, DealSearchField, DealStatus, DiscountType, NoteSort, SortDirection,
    SortField, StageSortField, TaxMethod,
};
