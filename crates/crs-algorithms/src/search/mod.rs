pub mod cdcl;
pub mod pn_mcts;
pub mod transposition;
pub mod unit_propagation;
pub mod watched_literals;

pub use cdcl::{Assignment, CdclInput, CdclOutput, CdclSolver, Clause};
pub use pn_mcts::{GameNode, PnMcts, PnMctsInput, PnMctsOutput};
pub use transposition::{TranspositionEntry, TranspositionInput, TranspositionOutput, TranspositionProbe, TranspositionTable};
pub use unit_propagation::{Conflict, ForcedMove, UnitPropagationInput, UnitPropagationOutput, UnitPropagator};
pub use watched_literals::{WatchedLiteralPropagator, WatchedLiteralsInput, WatchedLiteralsOutput};
