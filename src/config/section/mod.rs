//! Configuration section definitions.
//!
//! Each module corresponds to a section in `doctools.toml`:
//!
//! | Module    | TOML Section | Purpose                                  |
//! |-----------|--------------|------------------------------------------|
//! | `diagram` | `[diagram]`  | TikZ sources, digest, toolchain commands |
//! | `serve`   | `[serve]`    | Development server                       |
//! | `authors` | `[authors]`  | Author slide generation                  |
//! | `doctor`  | `[doctor]`   | Environment requirements                 |

mod authors;
mod diagram;
mod doctor;
mod serve;

pub use authors::AuthorsConfig;
pub use diagram::DiagramConfig;
pub use doctor::{DoctorConfig, Requirement};
pub use serve::ServeConfig;
