//! # Download Dispatcher
//!
//! Writes confirmed dataset responses into the download directory under an
//! independent concurrency limit. Bytes reach the disk either directly, by
//! streaming the response body into the file, or through a sandboxed helper
//! process that receives the buffered body on stdin and has no network.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::crawler::CrawlError;

/// Filename used when the URL path has no usable last segment
pub const FALLBACK_FILENAME: &str = "download";

/// External command that writes one download inside a sandbox
///
/// `{dir}` and `{url}` in the arguments are replaced by the download directory
/// and the dataset URL. The body is written to the command's stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for SandboxCommand {
    fn default() -> Self {
        Self {
            program: "firejail".to_string(),
            args: [
                "--private={dir}",
                "--net=none",
                "--caps.drop=all",
                "--seccomp",
                "--shell=none",
                "--quiet",
                "geoharvest-writer",
                "--url",
                "{url}",
                "--dir",
                "{dir}",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl SandboxCommand {
    /// A sandbox invoking `program` with `args`
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn render_args(&self, url: &str, dir: &Path) -> Vec<String> {
        let dir = dir.display().to_string();
        self.args
            .iter()
            .map(|arg| arg.replace("{dir}", &dir).replace("{url}", url))
            .collect()
    }
}

/// How downloaded bytes reach the disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadMode {
    /// Stream the body straight into the destination file
    Direct,
    /// Buffer the body and hand it to a sandboxed writer
    Sandboxed(SandboxCommand),
}

impl Default for DownloadMode {
    fn default() -> Self {
        Self::Sandboxed(SandboxCommand::default())
    }
}

/// Filename for a dataset URL: the last path segment, or `download`
pub fn filename_for(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty() && name != "." && name != "..")
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

/// Write `bytes` to `dir`, naming the file after `url`
///
/// An existing file with the same name is truncated. This is the writing half
/// of sandboxed downloads, run inside the sandbox by `geoharvest-writer`.
pub fn write_bytes(dir: &Path, url: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    let path = dir.join(filename_for(url));
    std::fs::write(&path, bytes)?;
    Ok(path)
}

/// Writes dataset responses into a directory
#[derive(Debug, Clone)]
pub struct DownloadDispatcher {
    dir: PathBuf,
    mode: DownloadMode,
    permits: Arc<Semaphore>,
}

impl DownloadDispatcher {
    /// Create a dispatcher writing into `dir` with at most `concurrency`
    /// downloads in flight
    pub fn new(dir: impl Into<PathBuf>, mode: DownloadMode, concurrency: usize) -> Self {
        Self {
            dir: dir.into(),
            mode,
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Destination directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Download in the background, logging the outcome
    pub fn spawn(&self, url: String, response: reqwest::Response) -> JoinHandle<()> {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            match dispatcher.download(&url, response).await {
                Ok(path) => info!("Downloaded {} to {}", url, path.display()),
                Err(e) => error!("Download of {} failed: {}", url, e),
            }
        })
    }

    /// Write one response to the download directory
    ///
    /// An existing file with the same name is truncated.
    #[instrument(skip(self, response))]
    pub async fn download(&self, url: &str, response: reqwest::Response) -> Result<PathBuf, CrawlError> {
        let _permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| CrawlError::Other(format!("Failed to acquire download permit: {}", e)))?;

        let path = self.dir.join(filename_for(url));
        match &self.mode {
            DownloadMode::Direct => self.write_direct(response, &path).await?,
            DownloadMode::Sandboxed(sandbox) => self.write_sandboxed(sandbox, url, response).await?,
        }
        Ok(path)
    }

    async fn write_direct(&self, mut response: reqwest::Response, path: &Path) -> Result<(), CrawlError> {
        let mut file = File::create(path).await?;
        let mut written = 0usize;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len();
        }
        file.flush().await?;
        debug!("Wrote {} bytes to {}", written, path.display());
        Ok(())
    }

    async fn write_sandboxed(
        &self,
        sandbox: &SandboxCommand,
        url: &str,
        response: reqwest::Response,
    ) -> Result<(), CrawlError> {
        let body = response.bytes().await?;

        let mut child = Command::new(&sandbox.program)
            .args(sandbox.render_args(url, &self.dir))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CrawlError::Sandbox(format!("Failed to start {}: {}", sandbox.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&body).await?;
            // Closing stdin signals end of input to the writer.
            drop(stdin);
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(CrawlError::Sandbox(format!(
                "{} exited with {}: {}",
                sandbox.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        debug!("Sandbox wrote {} bytes for {}", body.len(), url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use tempfile::TempDir;

    #[test]
    fn test_filename_for() {
        assert_eq!(filename_for("https://x.example/data/roads.zip"), "roads.zip");
        assert_eq!(filename_for("https://x.example/data/roads.zip?v=1#f"), "roads.zip");
        assert_eq!(filename_for("https://x.example/"), "download");
        assert_eq!(filename_for("https://x.example"), "download");
        assert_eq!(filename_for("https://x.example/dir/"), "download");
        assert_eq!(filename_for("not a url"), "download");
    }

    #[test]
    fn test_write_bytes_truncates() {
        let dir = TempDir::new().unwrap();
        let url = "https://x.example/grids/temp.nc";
        write_bytes(dir.path(), url, b"a much longer first version").unwrap();
        let path = write_bytes(dir.path(), url, b"v2").unwrap();
        assert_eq!(path, dir.path().join("temp.nc"));
        assert_eq!(std::fs::read(path).unwrap(), b"v2");

        let fallback = write_bytes(dir.path(), "https://x.example/", b"x").unwrap();
        assert_eq!(fallback, dir.path().join("download"));
    }

    #[test]
    fn test_sandbox_args() {
        let args = SandboxCommand::default().render_args("https://x.example/a.zip", Path::new("/data"));
        assert_eq!(args[0], "--private=/data");
        assert!(args.contains(&"--net=none".to_string()));
        assert_eq!(&args[args.len() - 4..], ["--url", "https://x.example/a.zip", "--dir", "/data"]);
    }

    #[tokio::test]
    async fn test_direct_download_truncates() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("rivers.csv"), "old contents that are longer").unwrap();

        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/files/rivers.csv")
            .with_status(200)
            .with_header("content-type", "text/csv")
            .with_body("id,name\n1,Elm\n")
            .create_async()
            .await;

        let url = format!("{}/files/rivers.csv", server.url());
        let response = reqwest::get(&url).await.unwrap();
        let dispatcher = DownloadDispatcher::new(dir.path(), DownloadMode::Direct, 2);
        let path = dispatcher.download(&url, response).await.unwrap();

        assert_eq!(path, dir.path().join("rivers.csv"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "id,name\n1,Elm\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_sandboxed_download_pipes_body() {
        let dir = TempDir::new().unwrap();
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/grid.nc")
            .with_status(200)
            .with_body("netcdf bytes")
            .create_async()
            .await;

        // A shell stands in for the sandbox and writes stdin to the target.
        let sandbox = SandboxCommand::new(
            "sh",
            vec!["-c".into(), "cat > \"$0/grid.nc\"".into(), "{dir}".into()],
        );
        let url = format!("{}/grid.nc", server.url());
        let response = reqwest::get(&url).await.unwrap();
        let dispatcher = DownloadDispatcher::new(dir.path(), DownloadMode::Sandboxed(sandbox), 1);
        dispatcher.download(&url, response).await.unwrap();

        let written = std::fs::read_to_string(dir.path().join("grid.nc")).unwrap();
        assert_eq!(written, "netcdf bytes");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_download_concurrency_is_capped() {
        let dir = TempDir::new().unwrap();
        let mut server = Server::new_async().await;
        let mut mocks = Vec::new();
        let mut responses = Vec::new();
        for name in ["a", "b", "c"] {
            let path = format!("/{name}.zip");
            mocks.push(
                server
                    .mock("GET", path.as_str())
                    .with_status(200)
                    .with_body(name)
                    .create_async()
                    .await,
            );
            let url = format!("{}{}", server.url(), path);
            responses.push((url.clone(), reqwest::get(&url).await.unwrap()));
        }

        // The writer takes a lock directory; a second writer running at the
        // same time finds it taken and leaves an `overlap` marker.
        let script = r#"mkdir "$0/lock" 2>/dev/null || touch "$0/overlap"
            sleep 0.2
            cat >> "$0/bodies"
            rmdir "$0/lock""#;
        let sandbox = SandboxCommand::new("sh", vec!["-c".into(), script.into(), "{dir}".into()]);
        let dispatcher = DownloadDispatcher::new(dir.path(), DownloadMode::Sandboxed(sandbox), 1);

        let downloads = responses
            .into_iter()
            .map(|(url, response)| {
                let dispatcher = dispatcher.clone();
                async move { dispatcher.download(&url, response).await }
            });
        for result in futures::future::join_all(downloads).await {
            result.unwrap();
        }

        assert!(!dir.path().join("overlap").exists());
        assert_eq!(std::fs::read_to_string(dir.path().join("bodies")).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_sandbox_failure_reported() {
        let dir = TempDir::new().unwrap();
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/a.zip")
            .with_status(200)
            .with_body("zip")
            .create_async()
            .await;

        let sandbox = SandboxCommand::new("geoharvest-no-such-sandbox", Vec::new());
        let url = format!("{}/a.zip", server.url());
        let response = reqwest::get(&url).await.unwrap();
        let dispatcher = DownloadDispatcher::new(dir.path(), DownloadMode::Sandboxed(sandbox), 1);
        let result = dispatcher.download(&url, response).await;
        assert!(matches!(result, Err(CrawlError::Sandbox(_))));
    }
}
