//! Request models and their payload/query builders.

pub mod comment;
pub mod deal;
pub mod note;
pub mod pipeline;
pub mod user;

pub use comment::{CommentBody, CommentListParams};
pub use deal::{
    normalize_label_name, DealListParams, DealProductUpdate, DealSearchParams, DealUpdate,
    NewDeal, NewDealProduct,
};
pub use note::{
    NewNote, NoteContent, NoteEntity, NoteListParams, NoteRefs, NoteTarget, NoteUpdate,
};
pub use pipeline::{PipelineListParams, StageListParams};
pub use user::User;
