//! JSON-lines bridge to an out-of-process solver.
//!
//! The bridge program is started as `<program> <args...> <spec-path>`. It
//! executes the last command of the specification and then speaks one JSON
//! object per line on stdout:
//!
//! ```text
//! {"kind":"ready","command":"run$1"}
//! {"kind":"instance","instance":{"signatures":[...]}}   <- first model, unprompted
//! {"kind":"instance","instance":{...}}                  <- answer to "next"
//! {"kind":"exhausted"}                                  <- no further models
//! {"kind":"error","message":"..."}
//! ```
//!
//! Each `next` line written to the bridge's stdin requests the next distinct
//! model (the solver's `fork(-1)`).
//!
//! The default bridge is `bridge/AlloyBridge.java` in this crate, run with
//! Java's single-file source launcher against the Alloy distribution jar.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use a2t_core::InstanceSnapshot;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::session::{Solver, SolverError, SolverSession};

/// Alloy distribution jar used by the default bridge command.
pub const ALLOY_JAR_DEFAULT: &str = "org.alloytools.alloy.dist.jar";

/// Bridge program used by the default bridge command.
pub const BRIDGE_MAIN_DEFAULT: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/bridge/AlloyBridge.java");

/// Request line asking for the next model.
const NEXT_REQUEST: &str = "next";

/// Messages sent by the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BridgeMessage {
    Ready { command: String },
    Instance { instance: InstanceSnapshot },
    Exhausted,
    Error { message: String },
}

/// Bridge process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Program to start
    pub program: String,
    /// Arguments placed before the specification path
    pub args: Vec<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::java(ALLOY_JAR_DEFAULT)
    }
}

impl BridgeConfig {
    /// `java -cp <jar> <crate>/bridge/AlloyBridge.java`
    pub fn java(alloy_jar: impl Into<String>) -> Self {
        Self {
            program: "java".to_string(),
            args: vec![
                "-cp".to_string(),
                alloy_jar.into(),
                BRIDGE_MAIN_DEFAULT.to_string(),
            ],
        }
    }

    /// Parse a whitespace-separated command line. `None` if it is blank.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Config from `A2T_SOLVER` (full command line), falling back to the java
    /// bridge with the jar from `ALLOY_JAR`.
    pub fn from_env() -> Self {
        if let Some(config) = std::env::var("A2T_SOLVER")
            .ok()
            .and_then(|line| Self::from_command_line(&line))
        {
            return config;
        }
        match std::env::var("ALLOY_JAR") {
            Ok(jar) if !jar.trim().is_empty() => Self::java(jar.trim()),
            _ => Self::default(),
        }
    }
}

/// Solver backed by a bridge subprocess.
#[derive(Debug, Clone, Default)]
pub struct BridgeSolver {
    config: BridgeConfig,
}

impl BridgeSolver {
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(BridgeConfig::from_env())
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}

impl Solver for BridgeSolver {
    type Session = BridgeSession;

    fn execute(&mut self, spec_path: &Path) -> Result<BridgeSession, SolverError> {
        debug!(program = %self.config.program, spec = %spec_path.display(), "starting solver bridge");

        let mut child = Command::new(&self.config.program)
            .args(&self.config.args)
            .arg(spec_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| SolverError::Spawn {
                program: self.config.program.clone(),
                source,
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SolverError::Closed);
        };

        match JsonLinesSession::handshake(BufReader::new(stdout), stdin) {
            Ok(lines) => {
                debug!(command = lines.command_label(), "solver bridge ready");
                Ok(BridgeSession { child, lines })
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                Err(e)
            }
        }
    }
}

/// Session over a running bridge process. The process is killed on drop.
pub struct BridgeSession {
    child: Child,
    lines: JsonLinesSession<BufReader<ChildStdout>, ChildStdin>,
}

impl SolverSession for BridgeSession {
    type Instance = InstanceSnapshot;

    fn command_label(&self) -> &str {
        self.lines.command_label()
    }

    fn next_instance(&mut self) -> Result<Option<InstanceSnapshot>, SolverError> {
        self.lines.next_instance()
    }
}

impl Drop for BridgeSession {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Bridge protocol over any line reader and writer.
pub struct JsonLinesSession<R, W> {
    reader: R,
    writer: W,
    command: String,
    started: bool,
    exhausted: bool,
}

impl<R: BufRead, W: Write> JsonLinesSession<R, W> {
    /// Wait for the `ready` message and build the session.
    pub fn handshake(reader: R, writer: W) -> Result<Self, SolverError> {
        let mut session = Self {
            reader,
            writer,
            command: String::new(),
            started: false,
            exhausted: false,
        };
        match session.read_message()? {
            BridgeMessage::Ready { command } => {
                session.command = command;
                Ok(session)
            }
            BridgeMessage::Error { message } => Err(SolverError::Solver(message)),
            other => Err(SolverError::Protocol(format!(
                "expected ready message, got {:?}",
                other
            ))),
        }
    }

    fn read_message(&mut self) -> Result<BridgeMessage, SolverError> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(SolverError::Closed);
            }
            if !line.trim().is_empty() {
                break;
            }
        }
        serde_json::from_str(line.trim()).map_err(|e| SolverError::Protocol(e.to_string()))
    }
}

impl<R: BufRead, W: Write> SolverSession for JsonLinesSession<R, W> {
    type Instance = InstanceSnapshot;

    fn command_label(&self) -> &str {
        &self.command
    }

    fn next_instance(&mut self) -> Result<Option<InstanceSnapshot>, SolverError> {
        if self.exhausted {
            return Ok(None);
        }
        if self.started {
            writeln!(self.writer, "{}", NEXT_REQUEST)?;
            self.writer.flush()?;
        }
        self.started = true;

        match self.read_message()? {
            BridgeMessage::Instance { instance } => Ok(Some(instance)),
            BridgeMessage::Exhausted => {
                self.exhausted = true;
                Ok(None)
            }
            BridgeMessage::Error { message } => Err(SolverError::Solver(message)),
            BridgeMessage::Ready { .. } => {
                Err(SolverError::Protocol("unexpected ready message".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use a2t_core::InstanceQuery;

    use super::*;

    const TRANSCRIPT: &str = r#"{"kind":"ready","command":"run$1"}
{"kind":"instance","instance":{"signatures":[{"name":"this/Node","fields":[{"label":"neighbors","tuples":[["Node$0","Node$1"]]}]}]}}

{"kind":"instance","instance":{"signatures":[]}}
{"kind":"exhausted"}
"#;

    #[test]
    fn test_json_lines_enumeration() {
        let mut requests = Vec::new();
        let mut session =
            JsonLinesSession::handshake(Cursor::new(TRANSCRIPT), &mut requests).unwrap();
        assert_eq!(session.command_label(), "run$1");

        let first = session.next_instance().unwrap().unwrap();
        assert_eq!(first.eval("this/Node", "neighbors").len(), 1);
        assert!(session.next_instance().unwrap().is_some());
        assert!(session.next_instance().unwrap().is_none());
        assert!(session.next_instance().unwrap().is_none());
        drop(session);

        // The first model is unprompted; the second model and the
        // exhaustion answer took one request each.
        assert_eq!(String::from_utf8(requests).unwrap(), "next\nnext\n");
    }

    #[test]
    fn test_handshake_requires_ready() {
        let transcript = "{\"kind\":\"exhausted\"}\n";
        let result = JsonLinesSession::handshake(Cursor::new(transcript), Vec::new());
        assert!(matches!(result, Err(SolverError::Protocol(_))));
    }

    #[test]
    fn test_handshake_reports_solver_error() {
        let transcript = "{\"kind\":\"error\",\"message\":\"syntax error at line 3\"}\n";
        let result = JsonLinesSession::handshake(Cursor::new(transcript), Vec::new());
        assert!(matches!(result, Err(SolverError::Solver(m)) if m.contains("line 3")));
    }

    #[test]
    fn test_closed_stream() {
        let transcript = "{\"kind\":\"ready\",\"command\":\"run$1\"}\n";
        let mut session = JsonLinesSession::handshake(Cursor::new(transcript), Vec::new()).unwrap();
        assert!(matches!(session.next_instance(), Err(SolverError::Closed)));
    }

    #[test]
    fn test_malformed_message() {
        let transcript = "{\"kind\":\"ready\",\"command\":\"c\"}\nnot json\n";
        let mut session = JsonLinesSession::handshake(Cursor::new(transcript), Vec::new()).unwrap();
        assert!(matches!(session.next_instance(), Err(SolverError::Protocol(_))));
    }

    #[test]
    fn test_config_from_command_line() {
        let config = BridgeConfig::from_command_line("  python3 bridge.py --fast ").unwrap();
        assert_eq!(config.program, "python3");
        assert_eq!(config.args, vec!["bridge.py", "--fast"]);
        assert!(BridgeConfig::from_command_line("   ").is_none());
    }

    #[test]
    fn test_default_config_is_java_bridge() {
        let config = BridgeConfig::default();
        assert_eq!(config.program, "java");
        assert_eq!(config.args, vec!["-cp", ALLOY_JAR_DEFAULT, BRIDGE_MAIN_DEFAULT]);
    }

    #[test]
    fn test_default_bridge_program_ships_with_crate() {
        let source = std::fs::read_to_string(BRIDGE_MAIN_DEFAULT).unwrap();
        assert!(source.contains("public class AlloyBridge"));
        assert!(source.contains("fork(-1)"));
        assert!(source.contains(r#"\"kind\":\"exhausted\""#));
    }

    #[test]
    fn test_spawn_failure() {
        let mut solver = BridgeSolver::new(BridgeConfig {
            program: "/nonexistent/a2t-bridge".to_string(),
            args: Vec::new(),
        });
        let result = solver.execute(Path::new("spec.als"));
        assert!(matches!(result, Err(SolverError::Spawn { .. })));
    }

    #[cfg(unix)]
    mod unix {
        use std::time::{Duration, Instant};

        use super::*;

        /// `sh -c <script> bridge <spec>`: the specification path lands in `$1`.
        fn sh_bridge(script: &str) -> BridgeSolver {
            BridgeSolver::new(BridgeConfig {
                program: "sh".to_string(),
                args: vec!["-c".to_string(), script.to_string(), "bridge".to_string()],
            })
        }

        fn spec_file() -> tempfile::NamedTempFile {
            let file = tempfile::NamedTempFile::new().unwrap();
            std::fs::write(file.path(), "sig Node {}\nrun {} for 2").unwrap();
            file
        }

        const TWO_MODELS: &str = r#"
test -f "$1" || { echo '{"kind":"error","message":"no spec"}'; exit 1; }
echo '{"kind":"ready","command":"run$1"}'
echo '{"kind":"instance","instance":{"signatures":[{"name":"this/Node","atoms":["Node$0","Node$1"]}]}}'
read req; [ "$req" = next ] || exit 3
echo '{"kind":"instance","instance":{}}'
read req; [ "$req" = next ] || exit 3
echo '{"kind":"exhausted"}'
"#;

        #[test]
        fn test_execute_drives_child_over_pipes() {
            let spec = spec_file();
            let mut solver = sh_bridge(TWO_MODELS);
            let mut session = solver.execute(spec.path()).unwrap();
            assert_eq!(session.command_label(), "run$1");

            let all: Vec<_> = session.instances().collect::<Result<_, _>>().unwrap();
            assert_eq!(all.len(), 2);
            assert_eq!(all[0].signatures[0].atoms, vec!["Node$0", "Node$1"]);
            assert!(session.next_instance().unwrap().is_none());
        }

        #[test]
        fn test_execute_reports_rejected_specification() {
            let mut solver = sh_bridge(TWO_MODELS);
            let result = solver.execute(Path::new("/nonexistent/spec.als"));
            assert!(matches!(result, Err(SolverError::Solver(m)) if m == "no spec"));
        }

        #[test]
        fn test_child_exiting_early_is_closed_stream() {
            let spec = spec_file();
            let mut solver = sh_bridge(r#"echo '{"kind":"ready","command":"run$1"}'"#);
            let mut session = solver.execute(spec.path()).unwrap();
            assert!(matches!(session.next_instance(), Err(SolverError::Closed)));
        }

        #[test]
        fn test_drop_kills_and_reaps_child() {
            let spec = spec_file();
            let mut solver = sh_bridge(
                r#"echo '{"kind":"ready","command":"run$1"}'
echo '{"kind":"instance","instance":{}}'
exec sleep 30"#,
            );
            let mut session = solver.execute(spec.path()).unwrap();
            assert!(session.next_instance().unwrap().is_some());

            let start = Instant::now();
            drop(session);
            assert!(start.elapsed() < Duration::from_secs(10));
        }
    }
}
