//! LilyPond subprocess renderer.
//!
//! Each render gets a fresh `sources-*` directory under the configured working
//! directory holding `1.ly` and an `out/` directory. LilyPond runs either
//! inside a Docker container with that directory mounted at `/d`, or as a
//! native executable. The resulting `out/1.png` is read back and the
//! directory is removed.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::cancel::CancelFlag;
use crate::error::{RenderError, RenderResult};

/// Default timeout for one render (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default PNG resolution in dpi.
pub const DEFAULT_RESOLUTION: u32 = 300;

/// Default LilyPond container image.
pub const DEFAULT_DOCKER_IMAGE: &str = "docker.io/airdock/lilypond:latest";

/// Mount point of the render directory inside the container.
const CONTAINER_MOUNT: &str = "/d";

const SOURCE_FILE: &str = "1.ly";
const OUTPUT_DIR: &str = "out";
const OUTPUT_FILE: &str = "1.png";

/// How LilyPond is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// `docker run` with the configured image.
    #[default]
    Docker,
    /// A locally installed `lilypond` executable.
    Native,
}

impl Backend {
    /// Returns the string identifier for this backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Docker => "docker",
            Backend::Native => "native",
        }
    }
}

/// Configuration for the renderer.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub backend: Backend,
    /// Directory under which per-render directories are created.
    pub working_dir: PathBuf,
    /// Path to the LilyPond executable (native backend).
    pub lilypond_path: Option<PathBuf>,
    /// Container image (docker backend).
    pub docker_image: String,
    /// PNG resolution in dpi.
    pub resolution: u32,
    /// Timeout for one LilyPond run.
    pub timeout: Duration,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            working_dir: PathBuf::from("tmp"),
            lilypond_path: None,
            docker_image: DEFAULT_DOCKER_IMAGE.to_string(),
            resolution: DEFAULT_RESOLUTION,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl RendererConfig {
    /// Creates a new config with the given working directory.
    pub fn with_working_dir(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            ..Default::default()
        }
    }

    /// Sets the backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the LilyPond executable path.
    pub fn lilypond_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.lilypond_path = Some(path.into());
        self
    }

    /// Sets the container image.
    pub fn docker_image(mut self, image: impl Into<String>) -> Self {
        self.docker_image = image.into();
        self
    }

    /// Sets the PNG resolution.
    pub fn resolution(mut self, dpi: u32) -> Self {
        self.resolution = dpi;
        self
    }

    /// Sets the timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// Arguments passed to LilyPond itself.
pub fn lilypond_args(resolution: u32, out_dir: &str, source: &str) -> Vec<String> {
    vec![
        format!("-dresolution={}", resolution),
        "--png".to_string(),
        "-dbackend=eps".to_string(),
        "-dno-gs-load-fonts".to_string(),
        "-dinclude-eps-fonts".to_string(),
        "-o".to_string(),
        out_dir.to_string(),
        source.to_string(),
    ]
}

/// The LilyPond renderer.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RendererConfig,
    cancel: CancelFlag,
}

impl Renderer {
    /// Creates a new renderer with the given configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            cancel: CancelFlag::new(),
        }
    }

    /// Creates a renderer that stops when `cancel` is set.
    pub fn with_cancel(config: RendererConfig, cancel: CancelFlag) -> Self {
        Self { config, cancel }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    /// Finds the LilyPond executable path.
    fn find_lilypond(&self) -> RenderResult<PathBuf> {
        let candidates = ProgramCandidates {
            configured: self.config.lilypond_path.as_deref(),
            env_var: Some("LILYPOND_PATH"),
            names: LILYPOND_NAMES,
            common_paths: LILYPOND_COMMON_PATHS,
        };
        candidates.find().ok_or(RenderError::LilypondNotFound)
    }

    fn find_docker(&self) -> RenderResult<PathBuf> {
        let candidates = ProgramCandidates {
            configured: None,
            env_var: None,
            names: DOCKER_NAMES,
            common_paths: DOCKER_COMMON_PATHS,
        };
        candidates.find().ok_or(RenderError::DockerNotFound)
    }

    /// Program-independent argument list for a render in `work_dir`.
    ///
    /// `work_dir` must be absolute for the docker backend, since it is
    /// mounted into the container.
    pub fn command_args(&self, work_dir: &Path) -> Vec<String> {
        match self.config.backend {
            Backend::Docker => {
                let mut args = vec![
                    "run".to_string(),
                    "--rm".to_string(),
                    "-v".to_string(),
                    format!("{}:{}", work_dir.display(), CONTAINER_MOUNT),
                    self.config.docker_image.clone(),
                ];
                args.extend(lilypond_args(
                    self.config.resolution,
                    &format!("{}/{}", CONTAINER_MOUNT, OUTPUT_DIR),
                    &format!("{}/{}", CONTAINER_MOUNT, SOURCE_FILE),
                ));
                args
            }
            Backend::Native => lilypond_args(
                self.config.resolution,
                &work_dir.join(OUTPUT_DIR).display().to_string(),
                &work_dir.join(SOURCE_FILE).display().to_string(),
            ),
        }
    }

    /// Renders LilyPond `source` to PNG bytes.
    pub fn render_png(&self, source: &str) -> RenderResult<Vec<u8>> {
        if self.cancel.is_cancelled() {
            return Err(RenderError::Cancelled);
        }

        let program = match self.config.backend {
            Backend::Docker => self.find_docker()?,
            Backend::Native => self.find_lilypond()?,
        };

        let work_dir = self.create_work_dir()?;
        let work_path = absolute(work_dir.path())?;
        std::fs::create_dir(work_path.join(OUTPUT_DIR))?;
        std::fs::write(work_path.join(SOURCE_FILE), source)?;

        let args = self.command_args(&work_path);
        let command_line = format!("{} {}", program.display(), args.join(" "));

        let mut cmd = Command::new(&program);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let child = cmd.spawn().map_err(RenderError::SpawnFailed)?;
        let (status, stderr) = wait_with_timeout(child, self.config.timeout, &self.cancel)?;

        if !status.success() {
            let exit_code = status.code().unwrap_or(-1);
            return Err(RenderError::process_failed(command_line, exit_code, stderr));
        }

        let png_path = work_path.join(OUTPUT_DIR).join(OUTPUT_FILE);
        if !png_path.exists() {
            return Err(RenderError::OutputNotFound { path: png_path });
        }
        let png = std::fs::read(&png_path)?;

        work_dir.close()?;
        Ok(png)
    }

    fn create_work_dir(&self) -> RenderResult<tempfile::TempDir> {
        let base = &self.config.working_dir;
        std::fs::create_dir_all(base).map_err(|e| RenderError::CreateWorkDir {
            path: base.clone(),
            source: e,
        })?;
        tempfile::Builder::new()
            .prefix("sources-")
            .tempdir_in(base)
            .map_err(|e| RenderError::CreateWorkDir {
                path: base.clone(),
                source: e,
            })
    }
}

#[cfg(windows)]
const LILYPOND_NAMES: &[&str] = &["lilypond.exe", "lilypond"];
#[cfg(not(windows))]
const LILYPOND_NAMES: &[&str] = &["lilypond"];

#[cfg(windows)]
const LILYPOND_COMMON_PATHS: &[&str] = &[
    "C:\\Program Files\\LilyPond\\bin\\lilypond.exe",
    "C:\\Program Files (x86)\\LilyPond\\usr\\bin\\lilypond.exe",
];
#[cfg(target_os = "macos")]
const LILYPOND_COMMON_PATHS: &[&str] = &[
    "/opt/homebrew/bin/lilypond",
    "/usr/local/bin/lilypond",
    "/Applications/LilyPond.app/Contents/Resources/bin/lilypond",
];
#[cfg(not(any(windows, target_os = "macos")))]
const LILYPOND_COMMON_PATHS: &[&str] = &["/usr/bin/lilypond", "/usr/local/bin/lilypond"];

#[cfg(windows)]
const DOCKER_NAMES: &[&str] = &["docker.exe", "docker"];
#[cfg(not(windows))]
const DOCKER_NAMES: &[&str] = &["docker"];

#[cfg(windows)]
const DOCKER_COMMON_PATHS: &[&str] =
    &["C:\\Program Files\\Docker\\Docker\\resources\\bin\\docker.exe"];
#[cfg(not(windows))]
const DOCKER_COMMON_PATHS: &[&str] = &["/usr/bin/docker", "/usr/local/bin/docker"];

/// Where to look for an executable, in priority order: an explicit path, an
/// environment variable, `PATH`, then well-known install locations.
struct ProgramCandidates<'a> {
    configured: Option<&'a Path>,
    env_var: Option<&'a str>,
    names: &'a [&'a str],
    common_paths: &'a [&'a str],
}

impl ProgramCandidates<'_> {
    fn find(&self) -> Option<PathBuf> {
        let configured = self.configured.map(Path::to_path_buf);
        let from_env = self
            .env_var
            .and_then(|var| std::env::var_os(var))
            .map(PathBuf::from);

        configured
            .into_iter()
            .chain(from_env)
            .find(|path| path.exists())
            .or_else(|| self.names.iter().find_map(|name| which::which(name).ok()))
            .or_else(|| {
                self.common_paths
                    .iter()
                    .map(PathBuf::from)
                    .find(|path| path.exists())
            })
    }
}

fn absolute(path: &Path) -> RenderResult<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Waits for `child`, killing it on timeout or cancellation.
///
/// Stderr is drained on a separate thread while waiting, so a child writing
/// more than the pipe buffer holds still runs to completion.
fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
    cancel: &CancelFlag,
) -> RenderResult<(ExitStatus, String)> {
    let start = Instant::now();
    let stderr_reader = child.stderr.take().map(|mut err| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = err.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    });

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                // the reader thread is left detached on kill: grandchildren may
                // still hold the pipe open
                if cancel.is_cancelled() {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RenderError::Cancelled);
                }
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RenderError::Timeout {
                        timeout_secs: timeout.as_secs(),
                    });
                }
                thread::sleep(Duration::from_millis(100));
            }
            Err(e) => return Err(RenderError::SpawnFailed(e)),
        }
    };

    let stderr = stderr_reader
        .and_then(|reader| reader.join().ok())
        .unwrap_or_default();

    Ok((status, stderr))
}
