//! Builds the linker command line per §4.5's emission contract (program name,
//! each object path, optional shared-library/PIC flags) and runs it behind a
//! `CommandRunner` so tests substitute a fake process instead of shelling out.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("linker exited with status {0}")]
pub struct LinkError(pub i32);

/// One invocation of the system linker: program name, input object paths, the
/// output executable path, and the flags the emission contract names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkerInvocation {
    pub program: String,
    pub objects: Vec<String>,
    pub output: String,
    pub shared: bool,
    pub position_independent: bool,
}

impl LinkerInvocation {
    pub fn new(program: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            objects: Vec::new(),
            output: output.into(),
            shared: false,
            position_independent: false,
        }
    }

    pub fn with_object(mut self, path: impl Into<String>) -> Self {
        self.objects.push(path.into());
        self
    }

    pub fn shared(mut self, shared: bool) -> Self {
        self.shared = shared;
        self
    }

    pub fn position_independent(mut self, pie: bool) -> Self {
        self.position_independent = pie;
        self
    }

    /// The command string built by concatenating the linker program,
    /// each object path, and the optional flags, in that order.
    pub fn command_line(&self) -> Vec<String> {
        let mut args = vec![self.program.clone()];
        args.extend(self.objects.iter().cloned());
        args.push("-o".to_string());
        args.push(self.output.clone());
        if self.shared {
            args.push("-shared".to_string());
        }
        if self.position_independent {
            args.push("-pie".to_string());
        }
        args
    }

    /// Runs the invocation through `runner`, turning a nonzero exit code into
    /// a linking failure per §7.
    pub fn run(&self, runner: &dyn CommandRunner) -> Result<(), LinkError> {
        let args = self.command_line();
        let status = runner.run(&args[0], &args[1..]);
        if status == 0 {
            Ok(())
        } else {
            Err(LinkError(status))
        }
    }
}

/// Spawns a command and returns its exit status. The real implementation
/// shells out; tests substitute a fake that returns a fixed status without
/// touching the filesystem or a process table.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> i32;
}

/// Spawns the command for real via `std::process::Command`.
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> i32 {
        std::process::Command::new(program)
            .args(args)
            .status()
            .map(|status| status.code().unwrap_or(1))
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod linker_tests {
    use super::*;

    struct FakeRunner {
        exit_code: i32,
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, _program: &str, _args: &[String]) -> i32 {
            self.exit_code
        }
    }

    #[test]
    fn command_line_concatenates_program_objects_and_output() {
        let invocation = LinkerInvocation::new("cc", "a.out").with_object("a.o").with_object("b.o");
        assert_eq!(invocation.command_line(), vec!["cc", "a.o", "b.o", "-o", "a.out"]);
    }

    #[test]
    fn shared_and_pie_flags_are_appended_when_set() {
        let invocation = LinkerInvocation::new("cc", "lib.so")
            .with_object("a.o")
            .shared(true)
            .position_independent(true);
        let args = invocation.command_line();
        assert!(args.contains(&"-shared".to_string()));
        assert!(args.contains(&"-pie".to_string()));
    }

    #[test]
    fn a_nonzero_exit_status_is_reported_as_a_link_error() {
        let invocation = LinkerInvocation::new("cc", "a.out").with_object("a.o");
        let err = invocation.run(&FakeRunner { exit_code: 1 }).unwrap_err();
        assert_eq!(err, LinkError(1));
    }

    #[test]
    fn a_zero_exit_status_succeeds() {
        let invocation = LinkerInvocation::new("cc", "a.out").with_object("a.o");
        assert!(invocation.run(&FakeRunner { exit_code: 0 }).is_ok());
    }
}
