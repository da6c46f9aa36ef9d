pub mod field;
pub mod form;
pub mod response;

pub use field::{Field, FieldKind, FieldPatch};
pub use form::{Form, FormPatch, FormRecord, PublishedForm};
pub use response::{Answer, FormResponse};
