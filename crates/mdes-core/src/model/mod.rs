pub mod code_list;
pub mod disposition_code;
pub mod overrides;
pub mod table;
pub mod variable;
pub mod variable_type;

pub use code_list::{CodeList, CodeListEntry};
pub use disposition_code::DispositionCode;
pub use overrides::{
    ForeignKeyOverride, ForeignKeyResolution, HeuristicOverrides, InstrumentTableClassification,
};
pub use table::Table;
pub use variable::{Pii, Status, Variable};
pub use variable_type::{Pattern, VariableType};
