pub mod response;
pub mod summary;
pub mod symptom;

pub use response::*;
pub use summary::*;
pub use symptom::*;
