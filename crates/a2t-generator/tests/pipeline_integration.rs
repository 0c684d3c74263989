//! End-to-end pipeline runs against canned solvers.

use std::fs;
use std::path::Path;

use a2t_core::InstanceSnapshot;
use a2t_generator::{
    EchoTemplate, EnumerationOutcome, IndexStyle, Pipeline, PipelineConfig, PipelineError,
    SimpleTemplate, VotingTemplate,
};
use a2t_solver::CannedSolver;

const ECHO_SPEC: &str = "sig Node { neighbors: set Node }\n\
check AncestorProperties {\n\
  all n: Node | n in n.*neighbors\n\
} for 5 but 1..steps\n";

fn echo_workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in ["Echo.tla", "Relation.tla", "MCEcho.cfg"] {
        fs::write(dir.path().join(file), format!("\\* {file}\n")).unwrap();
    }
    fs::write(dir.path().join("Echo.als"), ECHO_SPEC).unwrap();
    dir
}

fn voting_workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in ["Voting.tla", "TLAPS.tla", "MCVoting.cfg"] {
        fs::write(dir.path().join(file), format!("\\* {file}\n")).unwrap();
    }
    fs::write(dir.path().join("Voting.als"), "check Inv { all q: Quorum | some q.nodes }\n").unwrap();
    dir
}

fn neighbors(pairs: &[(&str, &str)]) -> InstanceSnapshot {
    InstanceSnapshot::new().with_field("this/Node", "neighbors", pairs.iter().copied())
}

fn quorum(pairs: &[(&str, &str)]) -> InstanceSnapshot {
    InstanceSnapshot::new().with_field("this/Quorum", "nodes", pairs.iter().copied())
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_voting_run_writes_one_directory_per_instance() {
    let work = voting_workspace();
    let solver = CannedSolver::new(vec![
        quorum(&[("Quorum$0", "Acceptor$0"), ("Quorum$1", "Acceptor$1")]),
        quorum(&[("Quorum$0", "Acceptor$0"), ("Quorum$0", "Acceptor$1")]),
    ]);
    let config = PipelineConfig::default().with_output_root(work.path());
    let mut pipeline = Pipeline::new(solver, Box::new(VotingTemplate), config);

    let report = pipeline.run(&work.path().join("Voting.als"), 2).unwrap();

    let base = work.path().join("config_Voting_n02");
    assert_eq!(report.base_dir, base);
    assert_eq!(
        entries(&base),
        vec!["Voting.als", "config_Voting_n02_01", "config_Voting_n02_02"]
    );
    assert_eq!(
        entries(&base.join("config_Voting_n02_01")),
        vec!["MCVoting.cfg", "MCVoting.tla", "TLAPS.tla", "Voting.tla"]
    );
    assert!(matches!(
        report.outcome,
        Some(EnumerationOutcome::Exhausted { instances: 2, .. })
    ));
    assert_eq!(report.command, "run$canned");

    let first = fs::read_to_string(base.join("config_Voting_n02_01/MCVoting.tla")).unwrap();
    let second = fs::read_to_string(base.join("config_Voting_n02_02/MCVoting.tla")).unwrap();
    assert!(first.contains("MCQuorum == {{a1}, {a2}}\n"));
    assert!(second.contains("MCQuorum == {{a1, a2}}\n"));
    assert!(first.contains("MCAcceptor == {a1, a2}\n"));
}

#[test]
fn test_solver_input_carries_run_command_and_is_removed() {
    let work = voting_workspace();
    let config = PipelineConfig::default().with_output_root(work.path().join("out"));
    let mut pipeline = Pipeline::new(CannedSolver::unsatisfiable(), Box::new(VotingTemplate), config);

    pipeline.run(&work.path().join("Voting.als"), 3).unwrap();

    let solver = pipeline.solver();
    assert_eq!(solver.executed().len(), 1);
    assert_eq!(
        solver.inputs()[0],
        "check Inv { all q: Quorum | some q.nodes }\n\n\
run {} for exactly 3 Acceptor, exactly 3 Quorum, exactly 2 Value, 2 Ballot"
    );
    // The temporary input lived next to the specification and is gone now.
    assert_eq!(solver.executed()[0].parent(), Some(work.path()));
    assert!(!solver.executed()[0].exists());
}

#[test]
fn test_scoped_specification_copy() {
    let work = echo_workspace();
    let config = PipelineConfig::default().with_output_root(work.path());
    let mut pipeline = Pipeline::new(CannedSolver::unsatisfiable(), Box::new(EchoTemplate), config);

    let report = pipeline.run(&work.path().join("Echo.als"), 3).unwrap();

    assert_eq!(report.scoped_spec, work.path().join("config_Echo_n03/Echo.als"));
    assert_eq!(
        fs::read_to_string(&report.scoped_spec).unwrap(),
        "sig Node { neighbors: set Node }\n\
check AncestorProperties {\n\
  all n: Node | n in n.*neighbors\n\
} for exactly 3 Node, 1..steps\n"
    );
    // The original specification is untouched.
    assert_eq!(fs::read_to_string(work.path().join("Echo.als")).unwrap(), ECHO_SPEC);
}

#[test]
fn test_no_instance_writes_no_config_directories() {
    let work = echo_workspace();
    let config = PipelineConfig::default().with_output_root(work.path());
    let mut pipeline = Pipeline::new(CannedSolver::unsatisfiable(), Box::new(EchoTemplate), config);

    let report = pipeline.run(&work.path().join("Echo.als"), 2).unwrap();

    assert_eq!(report.outcome, Some(EnumerationOutcome::NoInstance));
    assert!(report.configs.is_empty());
    assert_eq!(entries(&report.base_dir), vec!["Echo.als"]);
}

#[test]
fn test_echo_fan_out_across_instances() {
    let work = echo_workspace();
    let solver = CannedSolver::new(vec![
        neighbors(&[("Node$0", "Node$1")]),
        neighbors(&[("Node$1", "Node$0"), ("Node$0", "Node$0")]),
    ]);
    let config = PipelineConfig::default()
        .with_output_root(work.path())
        .with_index_style(IndexStyle::Plain);
    let mut pipeline = Pipeline::new(solver, Box::new(EchoTemplate), config);

    let report = pipeline.run(&work.path().join("Echo.als"), 2).unwrap();

    let names: Vec<_> = report
        .configs
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["config_Echo_n02_1", "config_Echo_n02_2", "config_Echo_n02_3", "config_Echo_n02_4"]
    );

    let third = fs::read_to_string(report.configs[2].join("MCEcho.tla")).unwrap();
    assert!(third.contains("I1 == \"a\"\n"));
    assert!(third.contains("<<\"a\", \"a\">> :> TRUE @@\n"));
    assert!(third.contains("<<\"a\", \"b\">> :> FALSE @@\n"));
    assert!(third.contains("<<\"b\", \"a\">> :> TRUE @@\n"));
}

#[test]
fn test_rerun_does_not_overwrite_support_files() {
    let work = voting_workspace();
    let spec = work.path().join("Voting.als");
    let instances = vec![quorum(&[("Quorum$0", "Acceptor$0")])];

    let config = PipelineConfig::default().with_output_root(work.path());
    Pipeline::new(CannedSolver::new(instances.clone()), Box::new(VotingTemplate), config.clone())
        .run(&spec, 1)
        .unwrap();

    let kept = work.path().join("config_Voting_n01/config_Voting_n01_01/Voting.tla");
    fs::write(&kept, "\\* edited by hand\n").unwrap();

    Pipeline::new(CannedSolver::new(instances), Box::new(VotingTemplate), config)
        .run(&spec, 1)
        .unwrap();

    assert_eq!(fs::read_to_string(&kept).unwrap(), "\\* edited by hand\n");
}

#[test]
fn test_solver_failure_keeps_partial_output() {
    let work = voting_workspace();
    let solver = CannedSolver::new(vec![
        quorum(&[("Quorum$0", "Acceptor$0")]),
        quorum(&[("Quorum$0", "Acceptor$1")]),
        quorum(&[("Quorum$1", "Acceptor$1")]),
    ])
    .failing_after(2);
    let config = PipelineConfig::default().with_output_root(work.path());
    let mut pipeline = Pipeline::new(solver, Box::new(VotingTemplate), config);

    let err = pipeline.run(&work.path().join("Voting.als"), 2).unwrap_err();

    assert!(err.is_solver_stage());
    let PipelineError::Driver(driver) = err else {
        panic!("expected a driver error");
    };
    assert_eq!(driver.report.configs.len(), 2);
    for dir in &driver.report.configs {
        assert!(dir.join("MCVoting.tla").is_file());
    }
    // The temporary solver input is removed on the error path too.
    assert!(!pipeline.solver().executed()[0].exists());
}

#[test]
fn test_simple_writes_single_config_even_when_unsatisfiable() {
    let work = tempfile::tempdir().unwrap();
    fs::write(work.path().join("Simple.tla"), "").unwrap();
    fs::write(work.path().join("TLAPS.tla"), "").unwrap();
    fs::write(work.path().join("Simple.als"), "check Invariants { ok }\n").unwrap();

    let config = PipelineConfig::default().with_output_root(work.path());
    let mut pipeline = Pipeline::new(CannedSolver::unsatisfiable(), Box::new(SimpleTemplate), config);
    let report = pipeline.run(&work.path().join("Simple.als"), 4).unwrap();

    // The command still runs; its instances are not used.
    assert_eq!(pipeline.solver().executed().len(), 1);
    assert!(pipeline.solver().inputs()[0].ends_with("run {} for exactly 4 Process"));
    assert!(!pipeline.solver().executed()[0].exists());
    assert_eq!(report.configs.len(), 1);
    assert_eq!(
        fs::read_to_string(report.configs[0].join("Simple.cfg")).unwrap(),
        "\nCONSTANT N = 4\nSPECIFICATION Spec\nINVARIANTS PCorrect TypeOK Inv\n"
    );
}

#[test]
fn test_scope_beyond_labels_is_rejected_before_any_output() {
    let work = voting_workspace();
    let config = PipelineConfig::default().with_output_root(work.path());
    let mut pipeline = Pipeline::new(CannedSolver::unsatisfiable(), Box::new(VotingTemplate), config);

    let err = pipeline.run(&work.path().join("Voting.als"), 5).unwrap_err();

    assert!(matches!(err, PipelineError::Template(_)));
    assert!(!work.path().join("config_Voting_n05").exists());
}
