//! Runtime faults. Each one halts the walk and becomes an error-list entry.

use gempath_types::ErrorCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeFault {
    #[error("Command {step}: tried to move off the map.")]
    OffMap { step: usize },
    #[error("Command {step}: ran into an impassable cell (止).")]
    WallCollision { step: usize },
    #[error("Command {step}: there is no gem here.")]
    NoGem { step: usize },
    #[error("Command {step}: there is no switch here.")]
    NoSwitch { step: usize },
    #[error("Command {step}: warp W{warp_id} has no destination.")]
    UnresolvedPortal { step: usize, warp_id: u32 },
    #[error("Exceeded {limit} execution steps. The script may contain an infinite loop.")]
    BudgetExceeded { limit: u32 },
    #[error("A while loop exceeded {limit} iterations. Check its condition and body.")]
    WhileLimitExceeded { limit: u32 },
    #[error("call to undefined function: {name}()")]
    UndefinedFunction { name: String },
    #[error("recursive function calls are not supported: {name}()")]
    Recursion { name: String },
    #[error("The map has no start position.")]
    MissingStart,
}

impl RuntimeFault {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::OffMap { .. } => ErrorCode::OUT_OF_BOUNDS,
            Self::WallCollision { .. } => ErrorCode::WALL_COLLISION,
            Self::NoGem { .. } => ErrorCode::NO_GEM,
            Self::NoSwitch { .. } => ErrorCode::NO_SWITCH,
            Self::UnresolvedPortal { .. } => ErrorCode::UNRESOLVED_PORTAL,
            Self::BudgetExceeded { .. } => ErrorCode::BUDGET_EXCEEDED,
            Self::WhileLimitExceeded { .. } => ErrorCode::WHILE_LIMIT_EXCEEDED,
            Self::UndefinedFunction { .. } => ErrorCode::UNDEFINED_FUNCTION,
            Self::Recursion { .. } => ErrorCode::RECURSION_NOT_ALLOWED,
            Self::MissingStart => ErrorCode::MISSING_START,
        }
    }
}
