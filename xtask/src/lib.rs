use anyhow::{bail, Context, Result};
use std::env;
use std::process::Command;

/// Cargo options shared by every task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub features: Vec<String>,
    pub release: bool,
}

impl BuildConfig {
    /// Join features into a single string suitable for passing to cargo.
    pub fn features_arg(&self) -> Option<String> {
        if self.features.is_empty() {
            None
        } else {
            Some(self.features.join(" "))
        }
    }

    fn apply(&self, cmd: &mut Command) {
        if self.release {
            cmd.arg("--release");
        }
        if let Some(f) = self.features_arg() {
            cmd.arg("--features").arg(f);
        }
    }
}

/// Detect build configuration from the current machine and `CHIRPZ_FEATURES`.
pub fn detect_config() -> BuildConfig {
    let nproc = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let extra = env::var("CHIRPZ_FEATURES").unwrap_or_default();
    let release = env::var("CHIRPZ_RELEASE").map(|v| v == "1").unwrap_or(false);
    compute_config(nproc, &extra, release)
}

/// Compute a [`BuildConfig`] from supplied inputs. This is separated for testing.
pub fn compute_config(nproc: usize, extra: &str, release: bool) -> BuildConfig {
    let mut features: Vec<String> = Vec::new();
    if nproc > 1 {
        features.push("parallel".into());
    }
    for feat in extra.split_whitespace() {
        if !features.iter().any(|f| f == feat) {
            features.push(feat.to_string());
        }
    }
    BuildConfig { features, release }
}

fn cargo(subcommand: &str) -> Command {
    let mut cmd = Command::new(env::var("CARGO").unwrap_or_else(|_| "cargo".into()));
    cmd.arg(subcommand);
    cmd
}

pub fn build_command(cfg: &BuildConfig) -> Command {
    let mut cmd = cargo("build");
    cmd.arg("--workspace");
    cfg.apply(&mut cmd);
    cmd
}

pub fn test_command(cfg: &BuildConfig) -> Command {
    let mut cmd = cargo("test");
    cmd.args(["-p", "chirpz"]);
    cfg.apply(&mut cmd);
    cmd
}

pub fn clippy_command() -> Command {
    let mut cmd = cargo("clippy");
    cmd.args(["--workspace", "--all-targets", "--all-features", "--", "-D", "warnings"]);
    cmd
}

pub fn fmt_command(check: bool) -> Command {
    let mut cmd = cargo("fmt");
    cmd.arg("--all");
    if check {
        cmd.args(["--", "--check"]);
    }
    cmd
}

pub fn bench_command(cfg: &BuildConfig, filter: Option<&str>) -> Command {
    let mut cmd = cargo("bench");
    cmd.args(["--manifest-path", "chirpz-bench/Cargo.toml"]);
    if let Some(f) = cfg.features_arg() {
        cmd.arg("--features").arg(f);
    }
    if let Some(filter) = filter {
        cmd.args(["--", filter]);
    }
    cmd
}

pub fn demo_command(cfg: &BuildConfig, name: &str) -> Command {
    let mut cmd = cargo("run");
    cmd.args(["--example", name]);
    let mut cfg = cfg.clone();
    if name == "verbose_logging" && !cfg.features.iter().any(|f| f == "verbose-logging") {
        cfg.features.push("verbose-logging".into());
    }
    cfg.apply(&mut cmd);
    cmd
}

/// Run `cmd` to completion, failing on spawn errors and non-zero exits.
pub fn run(mut cmd: Command) -> Result<()> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let status = cmd
        .status()
        .with_context(|| format!("failed to spawn {program}"))?;
    if !status.success() {
        bail!("{program} exited with {status}");
    }
    Ok(())
}
