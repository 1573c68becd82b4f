//! # PDF Compilation
//!
//! Turns a rendered `.tex` or `.html` file into a PDF by running an
//! external program next to it.
//!
//! ## Working Directory
//!
//! LaTeX writes its auxiliary files into the current directory, so the
//! child is started with `current_dir` set to the rendered file's parent.
//! The parent process never calls `set_current_dir`, so there is nothing
//! to restore when compilation fails.
//!
//! ## Output Capture
//!
//! The child's stdout and stderr are drained on two reader threads while
//! the main thread waits, so a chatty compiler cannot fill a pipe and
//! stall. The captured text is attached to `CompileError`.
//!
//! Once the child has exited or been killed, the readers get a short grace
//! period to reach end of file. A grandchild (a `latexmk` run, say) can
//! keep the pipes open past that; its output so far is returned and the
//! reader threads are left to finish on their own.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use mycv_core::CvError;

/// Auxiliary files LaTeX leaves next to the PDF.
pub const LATEX_AUX_EXTENSIONS: [&str; 3] = ["aux", "log", "out"];

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long the output readers may run on after the child is gone.
const READER_GRACE: Duration = Duration::from_millis(250);

/// External programs used to produce PDFs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Program for `.tex` files.
    pub latex_compiler: String,
    /// Arguments placed before the `.tex` file name.
    pub latex_args: Vec<String>,
    /// Program for `.html` files, called as `<args> <in.html> <out.pdf>`.
    pub html_converter: String,
    pub html_args: Vec<String>,
    /// Kill the child after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            latex_compiler: "pdflatex".to_string(),
            latex_args: vec![
                "-interaction=nonstopmode".to_string(),
                "-halt-on-error".to_string(),
            ],
            html_converter: "wkhtmltopdf".to_string(),
            html_args: Vec::new(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Latex,
    Html,
}

struct Captured {
    /// `None` when the child was killed on timeout.
    status: Option<ExitStatus>,
    stdout: String,
    stderr: String,
}

/// Compile a rendered document to PDF and return the PDF path.
///
/// The PDF is written next to the input with the same stem. On LaTeX
/// success the `.aux`, `.log` and `.out` siblings are removed.
///
/// # Errors
///
/// - `UnsupportedFormat` for anything but `.tex` / `.html`.
/// - `NotFound` if `rendered` does not exist.
/// - `MissingResource` if the program is not installed.
/// - `CompileError` on non-zero exit, timeout, or a missing PDF.
pub fn compile_to_pdf(rendered: &Path, config: &CompilerConfig) -> Result<PathBuf, CvError> {
    let ext = rendered
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let kind = match ext.as_str() {
        "tex" => SourceKind::Latex,
        "html" | "htm" => SourceKind::Html,
        _ => return Err(CvError::unsupported(rendered)),
    };
    if !rendered.is_file() {
        return Err(CvError::NotFound {
            what: "rendered document".to_string(),
            path: rendered.to_path_buf(),
        });
    }

    let (Some(file_name), Some(stem)) = (rendered.file_name(), rendered.file_stem()) else {
        return Err(CvError::unsupported(rendered));
    };
    let workdir = match rendered.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let stem = stem.to_string_lossy().into_owned();
    let pdf_name = format!("{stem}.pdf");
    let pdf_path = workdir.join(&pdf_name);

    // A stale PDF would hide a compiler that exits 0 without output.
    if pdf_path.exists() {
        std::fs::remove_file(&pdf_path).map_err(|e| CvError::io(&pdf_path, e))?;
    }

    let (program, mut args) = match kind {
        SourceKind::Latex => (&config.latex_compiler, config.latex_args.clone()),
        SourceKind::Html => (&config.html_converter, config.html_args.clone()),
    };
    args.push(file_name.to_string_lossy().into_owned());
    if kind == SourceKind::Html {
        args.push(pdf_name);
    }

    let mut cmd = Command::new(program);
    cmd.args(&args)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    tracing::debug!(program = %program, args = ?args, workdir = %workdir.display(), "compiling");
    let captured = run_captured(cmd, program, rendered, config.timeout)?;

    let compile_error = |status: String, captured: Captured| CvError::CompileError {
        program: program.clone(),
        file: rendered.to_path_buf(),
        status,
        stdout: captured.stdout,
        stderr: captured.stderr,
    };
    match captured.status {
        None => {
            let secs = config.timeout.map(|t| t.as_secs_f64()).unwrap_or_default();
            return Err(compile_error(format!("timed out after {secs}s"), captured));
        }
        Some(status) if !status.success() => {
            return Err(compile_error(status.to_string(), captured));
        }
        Some(_) if !pdf_path.is_file() => {
            return Err(compile_error(
                format!("exited successfully but {} was not produced", pdf_path.display()),
                captured,
            ));
        }
        Some(_) => {}
    }

    if kind == SourceKind::Latex {
        remove_aux_files(workdir, &stem);
    }
    tracing::info!(pdf = %pdf_path.display(), "compiled PDF");
    Ok(pdf_path)
}

fn run_captured(
    mut cmd: Command,
    program: &str,
    file: &Path,
    timeout: Option<Duration>,
) -> Result<Captured, CvError> {
    let mut child = cmd.spawn().map_err(|e| spawn_error(program, file, e))?;

    let out_reader = Drain::spawn(child.stdout.take());
    let err_reader = Drain::spawn(child.stderr.take());

    let status = match timeout {
        None => child.wait().map(Some),
        Some(limit) => wait_with_deadline(&mut child, limit),
    }
    .map_err(|e| CvError::io(file, e))?;

    let deadline = Instant::now() + READER_GRACE;
    Ok(Captured {
        status,
        stdout: out_reader.collect(deadline),
        stderr: err_reader.collect(deadline),
    })
}

/// Poll until the child exits or `limit` passes; on timeout kill and reap it.
fn wait_with_deadline(child: &mut Child, limit: Duration) -> std::io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= limit {
            tracing::warn!(pid = child.id(), "compiler timed out; killing");
            child.kill()?;
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// A pipe being read on its own thread into a shared buffer.
struct Drain {
    buf: Arc<Mutex<Vec<u8>>>,
    done: Receiver<()>,
}

impl Drain {
    fn spawn(pipe: Option<impl Read + Send + 'static>) -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let (tx, done) = mpsc::channel();
        let sink = Arc::clone(&buf);
        thread::spawn(move || {
            if let Some(mut pipe) = pipe {
                let mut chunk = [0u8; 8192];
                loop {
                    match pipe.read(&mut chunk) {
                        Ok(0) => break,
                        Ok(n) => match sink.lock() {
                            Ok(mut b) => b.extend_from_slice(&chunk[..n]),
                            Err(poisoned) => poisoned.into_inner().extend_from_slice(&chunk[..n]),
                        },
                        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            tracing::debug!(error = %e, "failed to read compiler output");
                            break;
                        }
                    }
                }
            }
            // The receiver may already have given up.
            let _ = tx.send(());
        });
        Self { buf, done }
    }

    /// Wait for end of file until `deadline`, then return what was read.
    fn collect(self, deadline: Instant) -> String {
        let wait = deadline.saturating_duration_since(Instant::now());
        if self.done.recv_timeout(wait).is_err() {
            tracing::debug!("compiler output still open after exit; keeping partial output");
        }
        let bytes = match self.buf.lock() {
            Ok(b) => b.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

fn spawn_error(program: &str, file: &Path, e: std::io::Error) -> CvError {
    match e.kind() {
        std::io::ErrorKind::NotFound => CvError::MissingResource {
            resource: program.to_string(),
            detail: "program not found on PATH; install it or set its path in the config file"
                .to_string(),
        },
        std::io::ErrorKind::PermissionDenied => CvError::MissingResource {
            resource: program.to_string(),
            detail: "program is not executable".to_string(),
        },
        _ => CvError::io(file, e),
    }
}

fn remove_aux_files(workdir: &Path, stem: &str) {
    for ext in LATEX_AUX_EXTENSIONS {
        let path = workdir.join(format!("{stem}.{ext}"));
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::debug!(path = %path.display(), error = %e, "could not remove aux file");
            }
        }
    }
}
