//! Data models for Notekeeper

mod draft;
mod note;
mod tag;
mod user;

pub use draft::{
    parse_tag_list, validate_credentials, DraftField, DraftNote, NewNote, ValidationError,
};
pub use note::{Note, NoteId};
pub use tag::{Tag, TagCase, TagId};
pub use user::User;
