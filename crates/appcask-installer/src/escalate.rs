use crate::exec::{CommandRunner, CommandSpec};

pub const ESCALATION_HELPER: &str = "pkexec";

pub fn escalation_helper_available(runner: &dyn CommandRunner) -> bool {
    matches!(
        runner.run(&CommandSpec::new("which").arg(ESCALATION_HELPER)),
        Ok(output) if output.success()
    )
}

pub fn escalation_missing_guidance() -> String {
    format!(
        "{ESCALATION_HELPER} is required for this operation but is not available.\n\n\
         Install PolicyKit with:\nsudo apt install policykit-1"
    )
}
