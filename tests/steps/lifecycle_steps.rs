//! Step definitions for runtime lifecycle scenarios.

use cucumber::then;
use featurerun::RuntimeError;

use crate::world::ReportWorld;

#[then("starting the run again is rejected")]
async fn restart_rejected(world: &mut ReportWorld) {
    assert_eq!(world.restart().await, Err(RuntimeError::AlreadyStarted));
}

#[then("attaching another listener is rejected")]
fn late_attach_rejected(world: &mut ReportWorld) {
    assert_eq!(world.attach_late(), Err(RuntimeError::ListenerAfterStart));
}

#[then("the report is written exactly once")]
fn single_report(world: &mut ReportWorld) {
    let report = world.report();
    assert_eq!(report.matches(" scenario").count(), 1, "{report}");
}
