pub mod codec;
pub mod context;
pub mod document;
pub mod drafts;
pub mod edit_session;
pub mod frontend;
pub mod model;
pub mod persistence;
pub mod projection;
pub mod records;
pub mod selection;
mod util;

pub use codec::{CodecError, JsonPlanCodec, PlanCodec};
pub use context::{EditorContext, UnitColumns};
pub use document::{ActionOutcome, Affordances, DocumentSession};
pub use drafts::{EntryDraft, PlanDraft, UnitDraft};
pub use edit_session::{Draft, EditError, EditOutcome, EditSession, RecordChange, SessionState};
pub use frontend::{FileRequest, Frontend, Notice, Prompt};
pub use model::{
    Entry, ModelError, MovementCatalog, MovementType, Plan, PlanHeader, Unit, DAY_KEYS, MAX_WEEKS,
};
pub use persistence::{ImportedPlan, PersistenceError, PersistenceGateway};
pub use projection::{rebuild, EntryRow, Project, ProjectedList, UnitRow};
pub use records::{RecordId, RecordList};
pub use selection::{ContextAction, ResolvedAction};
