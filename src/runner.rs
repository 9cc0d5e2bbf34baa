//! Sequential batch runner for the external McSAS3 command-line tools.
//!
//! One external process per input file, in order, on a single worker thread.
//! Per-file statuses and overall progress travel back to the UI thread over an
//! mpsc channel polled each frame. A failed file does not halt the run; there
//! are no retries and no timeout, so a hung child process blocks the run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use crate::error::AppError;

/// Result artifacts land next to their input file: `<stem>_output.hdf5`.
pub const RESULT_SUFFIX: &str = "_output.hdf5";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    Running,
    Complete,
    Failed,
}

impl TaskStatus {
    pub fn label(&self) -> &str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Running => "Running",
            TaskStatus::Complete => "Complete",
            TaskStatus::Failed => "Failed",
        }
    }
}

#[derive(Debug)]
pub enum RunnerEvent {
    /// Keyed by input path so the UI list can be edited while a run is in
    /// flight without misattributing statuses.
    Status { file: PathBuf, status: TaskStatus },
    /// Overall progress in percent, floor(100 * done / total).
    Progress(u8),
    /// Captured stderr or a launch error, shown verbatim to the user.
    Output(String),
    Finished,
}

pub fn result_file_for(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{stem}{RESULT_SUFFIX}"))
}

fn quote_path(path: &str) -> String {
    if path.contains(' ') {
        format!("\"{path}\"")
    } else {
        path.to_string()
    }
}

/// Substitute `{input_file}`, `{result_file}` and the caller's extra
/// placeholders into the template, then split the result into an argv vector.
pub fn build_command(
    template: &str,
    input_file: &Path,
    result_file: &Path,
    extra: &HashMap<String, String>,
) -> Result<Vec<String>, AppError> {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        filled.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after
            .find('}')
            .ok_or_else(|| AppError::Placeholder(after.to_string()))?;
        let key = &after[..end];
        let value = match key {
            "input_file" => quote_path(&input_file.to_string_lossy()),
            "result_file" => quote_path(&result_file.to_string_lossy()),
            other => quote_path(
                extra
                    .get(other)
                    .ok_or_else(|| AppError::Placeholder(other.to_string()))?,
            ),
        };
        filled.push_str(&value);
        rest = &after[end + 1..];
    }
    filled.push_str(rest);

    let argv = shell_words::split(&filled)?;
    if argv.is_empty() {
        return Err(AppError::EmptyCommand);
    }
    Ok(argv)
}

/// The worker loop. Emits exactly one `Complete` or `Failed` status per file
/// and exactly one `Finished` at the end.
pub fn run_tasks(
    files: &[PathBuf],
    template: &str,
    extra: &HashMap<String, String>,
    events: &Sender<RunnerEvent>,
) {
    let total = files.len();
    for (index, file) in files.iter().enumerate() {
        let result_file = result_file_for(file);
        if result_file.is_file() {
            if let Err(e) = std::fs::remove_file(&result_file) {
                log::warn!(
                    "Could not remove stale result file {}: {e}",
                    result_file.display()
                );
            }
        }

        let _ = events.send(RunnerEvent::Status {
            file: file.clone(),
            status: TaskStatus::Running,
        });

        let status = match build_command(template, file, &result_file, extra) {
            Ok(argv) => {
                log::info!("Running command: {argv:?}");
                match Command::new(&argv[0]).args(&argv[1..]).output() {
                    Ok(output) if output.status.success() => TaskStatus::Complete,
                    Ok(output) => {
                        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                        if !stderr.is_empty() {
                            let _ = events.send(RunnerEvent::Output(stderr));
                        }
                        TaskStatus::Failed
                    }
                    Err(e) => {
                        let _ = events.send(RunnerEvent::Output(format!(
                            "Failed to launch {}: {e}",
                            argv[0]
                        )));
                        TaskStatus::Failed
                    }
                }
            }
            Err(e) => {
                let _ = events.send(RunnerEvent::Output(e.to_string()));
                TaskStatus::Failed
            }
        };

        let _ = events.send(RunnerEvent::Status {
            file: file.clone(),
            status,
        });
        let _ = events.send(RunnerEvent::Progress((100 * (index + 1) / total) as u8));
    }

    let _ = events.send(RunnerEvent::Finished);
}

/// Handle to a run in flight. The worker owns file iteration exclusively; the
/// UI thread only drains events.
pub struct TaskRunner {
    receiver: Receiver<RunnerEvent>,
    handle: Option<JoinHandle<()>>,
}

impl TaskRunner {
    pub fn spawn(files: Vec<PathBuf>, template: String, extra: HashMap<String, String>) -> Self {
        let (tx, rx) = mpsc::channel();
        let handle = std::thread::spawn(move || run_tasks(&files, &template, &extra, &tx));
        Self {
            receiver: rx,
            handle: Some(handle),
        }
    }

    pub fn poll(&mut self) -> Vec<RunnerEvent> {
        self.receiver.try_iter().collect()
    }

    pub fn finish(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// One-shot invocation with captured stdout/stderr, used by the histogramming
/// test button. Removes `cleanup` (the temp config file) when done.
pub struct TestRun {
    receiver: Receiver<String>,
}

impl TestRun {
    pub fn spawn(argv: Vec<String>, cleanup: Option<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let message = match Command::new(&argv[0]).args(&argv[1..]).output() {
                Ok(output) if output.status.success() => format!(
                    "Command executed successfully:\n{}",
                    String::from_utf8_lossy(&output.stdout)
                ),
                Ok(output) => format!(
                    "Command failed with error:\n{}",
                    String::from_utf8_lossy(&output.stderr)
                ),
                Err(e) => format!("Failed to launch {}: {e}", argv[0]),
            };
            let _ = tx.send(message);
            if let Some(path) = cleanup {
                let _ = std::fs::remove_file(path);
            }
        });
        Self { receiver: rx }
    }

    pub fn poll(&self) -> Option<String> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_events(
        files: &[PathBuf],
        template: &str,
        extra: &HashMap<String, String>,
    ) -> Vec<RunnerEvent> {
        let (tx, rx) = mpsc::channel();
        run_tasks(files, template, extra, &tx);
        drop(tx);
        rx.try_iter().collect()
    }

    fn statuses_for(events: &[RunnerEvent], file: &Path) -> Vec<TaskStatus> {
        events
            .iter()
            .filter_map(|e| match e {
                RunnerEvent::Status { file: f, status } if f == file => Some(*status),
                _ => None,
            })
            .collect()
    }

    fn progress_sequence(events: &[RunnerEvent]) -> Vec<u8> {
        events
            .iter()
            .filter_map(|e| match e {
                RunnerEvent::Progress(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn result_file_keeps_directory_and_stem() {
        let result = result_file_for(Path::new("/data/runs/a.h5"));
        assert_eq!(result, PathBuf::from("/data/runs/a_output.hdf5"));
    }

    #[test]
    fn builds_optimization_command() {
        let extra = HashMap::from([
            ("data_config".to_string(), "read_configurations/csv.yaml".to_string()),
            ("run_config".to_string(), "run_configurations/sphere.yaml".to_string()),
        ]);
        let argv = build_command(
            "python3 -m mcsas3.mcsas3_cli_runner -f {input_file} -F {data_config} \
             -r {result_file} -R {run_config} -i 1 -d",
            Path::new("a.h5"),
            Path::new("a_output.hdf5"),
            &extra,
        )
        .unwrap();
        assert_eq!(
            argv,
            vec![
                "python3",
                "-m",
                "mcsas3.mcsas3_cli_runner",
                "-f",
                "a.h5",
                "-F",
                "read_configurations/csv.yaml",
                "-r",
                "a_output.hdf5",
                "-R",
                "run_configurations/sphere.yaml",
                "-i",
                "1",
                "-d",
            ]
        );
    }

    #[test]
    fn quotes_paths_with_whitespace() {
        let argv = build_command(
            "tool {input_file} {result_file}",
            Path::new("/my data/a.h5"),
            Path::new("/my data/a_output.hdf5"),
            &HashMap::new(),
        )
        .unwrap();
        // The quoted path survives as a single argument.
        assert_eq!(argv, vec!["tool", "/my data/a.h5", "/my data/a_output.hdf5"]);
    }

    #[test]
    fn unknown_placeholder_is_an_error() {
        let err = build_command(
            "tool {input_file} {mystery}",
            Path::new("a.h5"),
            Path::new("a_output.hdf5"),
            &HashMap::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("mystery"));
    }

    #[test]
    fn successful_run_emits_statuses_progress_and_one_finished() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a.h5");
        let b = tmp.path().join("b.h5");
        std::fs::write(&a, "").unwrap();
        std::fs::write(&b, "").unwrap();

        let events = collect_events(
            &[a.clone(), b.clone()],
            "true {input_file} {result_file}",
            &HashMap::new(),
        );

        assert_eq!(
            statuses_for(&events, &a),
            vec![TaskStatus::Running, TaskStatus::Complete]
        );
        assert_eq!(
            statuses_for(&events, &b),
            vec![TaskStatus::Running, TaskStatus::Complete]
        );
        assert_eq!(progress_sequence(&events), vec![50, 100]);
        let finished = events
            .iter()
            .filter(|e| matches!(e, RunnerEvent::Finished))
            .count();
        assert_eq!(finished, 1);
    }

    #[test]
    fn failure_does_not_halt_the_run() {
        let tmp = tempfile::tempdir().unwrap();
        let files: Vec<PathBuf> = (0..3)
            .map(|i| {
                let p = tmp.path().join(format!("f{i}.h5"));
                std::fs::write(&p, "").unwrap();
                p
            })
            .collect();

        let events = collect_events(&files, "false {input_file}", &HashMap::new());

        for file in &files {
            assert_eq!(
                statuses_for(&events, file),
                vec![TaskStatus::Running, TaskStatus::Failed]
            );
        }
        assert_eq!(progress_sequence(&events), vec![33, 66, 100]);
        assert!(events.iter().any(|e| matches!(e, RunnerEvent::Finished)));
    }

    #[test]
    fn stale_result_file_is_removed_before_the_run() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("a.h5");
        std::fs::write(&input, "").unwrap();
        let stale = result_file_for(&input);
        std::fs::write(&stale, "old result").unwrap();

        let _ = collect_events(
            &[input],
            "true {input_file} {result_file}",
            &HashMap::new(),
        );
        assert!(!stale.exists());
    }

    #[test]
    fn launch_failure_reports_failed_with_output() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("a.h5");
        std::fs::write(&input, "").unwrap();

        let events = collect_events(
            &[input.clone()],
            "definitely-not-a-real-binary-sasdesk {input_file}",
            &HashMap::new(),
        );
        assert_eq!(
            statuses_for(&events, &input),
            vec![TaskStatus::Running, TaskStatus::Failed]
        );
        assert!(events
            .iter()
            .any(|e| matches!(e, RunnerEvent::Output(msg) if msg.contains("Failed to launch"))));
    }
}
