//! Re-exported APIs for consumers of the transfer crate.

pub use crate::artifacts::{ArtifactReport, write_artifacts};
pub use crate::error::{ConfigurationError, Direction, ReconciliationError, TrajectoryError};
pub use crate::legs::{
    BodySequence, Leg, LegType, MissionParameters, TRANSFER_CASES, build_legs, case_index,
    case_sequence, decode_parameters, leg_types,
};
pub use crate::patched_conic::{
    LegStateHistory, Maneuver, ManeuverKind, PatchedConicProblem, PatchedConicSolution,
    StateSample, TrajectoryResult, solve_patched_conic,
};
pub use crate::pipeline::{TransferDefinition, TransferReport, run, run_scenario};
pub use crate::reconcile::{
    DependentVariableSample, ReconcileSettings, ReconciledLeg, reconcile_leg, reconcile_legs,
};
