//! Pipeline stages for one tool-processing session.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. a different share surface per platform) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! acquire ──▶ validate ──▶ request ──▶ remote ──▶ persist ──▶ share
//! (picker)    (gate)       (multipart) (HTTPS)    (documents)  (offer)
//! ```
//!
//! 1. [`acquire`]  — normalise picked files into [`crate::session::FileDescriptor`]s
//! 2. [`validate`] — enforce the tool's count/type/size/option rules
//! 3. [`request`]  — assemble the multipart payload, file parts in selection
//!    order (that order is the output's page/document order — a contract)
//! 4. [`remote`]   — the single network call; the only stage with I/O on the
//!    wire
//! 5. [`persist`]  — name and atomically write the returned artifact
//! 6. [`share`]    — offer the saved file to the platform share surface

pub mod acquire;
pub mod persist;
pub mod remote;
pub mod request;
pub mod share;
pub mod validate;
