//! Data loading sequencer
//!
//! One tokio task per selection runs the chain strictly in order:
//!
//! ```text
//! part(id) ─▶ checklist(id) ─▶ rules(checklist.uuid) ─▶ PartDataLoaded
//!                                                        │
//!                              file_path non-empty? ─────┴─▶ signed_url ─▶ PdfUrlReady | PdfUrlFailed
//! ```
//!
//! Any failure before `PartDataLoaded` publishes `PartDataFailed` and ends
//! the chain. Older chains are never cancelled; the session discards their
//! results by token.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use super::session::LoadRequest;
use crate::catalog::{CatalogResult, Part, PartRepository, Rule};
use crate::events::ViewerEvent;
use crate::presign::SignedUrlProvider;

#[derive(Clone)]
pub struct DataLoader {
    repo: Arc<dyn PartRepository>,
    urls: Arc<dyn SignedUrlProvider>,
    tx: mpsc::Sender<ViewerEvent>,
}

impl DataLoader {
    pub fn new(
        repo: Arc<dyn PartRepository>,
        urls: Arc<dyn SignedUrlProvider>,
        tx: mpsc::Sender<ViewerEvent>,
    ) -> Self {
        Self { repo, urls, tx }
    }

    /// Fetch the part list in the background
    pub fn spawn_list_parts(&self) -> tokio::task::JoinHandle<()> {
        let loader = self.clone();
        tokio::spawn(async move { loader.list_parts().await })
    }

    /// Start the load chain for a selection in the background
    pub fn spawn(&self, request: LoadRequest) -> tokio::task::JoinHandle<()> {
        let loader = self.clone();
        tokio::spawn(async move { loader.run(request).await })
    }

    pub async fn list_parts(&self) {
        let event = match self.repo.list_parts().await {
            Ok(parts) => ViewerEvent::PartsListed { parts },
            Err(e) => ViewerEvent::PartsListFailed {
                message: e.to_string(),
            },
        };
        self.publish(event).await;
    }

    /// Run the whole chain for one selection
    pub async fn run(&self, request: LoadRequest) {
        let LoadRequest { token, part_id } = request;
        let started = Instant::now();

        let (part, rules) = match self.fetch_part_data(&part_id).await {
            Ok(data) => data,
            Err(e) => {
                self.publish(ViewerEvent::PartDataFailed {
                    token,
                    message: e.to_string(),
                })
                .await;
                return;
            }
        };

        let file_path = part.storage_path().map(str::to_string);
        tracing::debug!(
            part_id = %part_id,
            rules = rules.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Part data loaded"
        );

        let delivered = self
            .publish(ViewerEvent::PartDataLoaded {
                token,
                part,
                rules,
                elapsed: started.elapsed(),
            })
            .await;

        let Some(file_path) = file_path else {
            return;
        };
        if !delivered {
            return;
        }

        let url_started = Instant::now();
        let event = match self.urls.signed_url(&file_path).await {
            Ok(url) => ViewerEvent::PdfUrlReady {
                token,
                url,
                elapsed: url_started.elapsed(),
            },
            Err(e) => ViewerEvent::PdfUrlFailed {
                token,
                message: format!("{e:#}"),
            },
        };
        self.publish(event).await;
    }

    async fn fetch_part_data(&self, part_id: &str) -> CatalogResult<(Part, Vec<Rule>)> {
        let part = self.repo.part(part_id).await?;
        let checklist = self.repo.checklist(part_id).await?;
        let rules = self.repo.rules(&checklist.uuid).await?;
        Ok((part, rules))
    }

    /// Send to the viewer; false once the viewer has gone away
    async fn publish(&self, event: ViewerEvent) -> bool {
        let kind = event.kind();
        if self.tx.send(event).await.is_err() {
            tracing::debug!("Viewer closed, dropping {}", kind);
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::memory::MemoryCatalog;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Signs everything as `signed://<path>`, or fails for listed paths
    #[derive(Default)]
    struct FakeUrls {
        failing: Vec<String>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SignedUrlProvider for FakeUrls {
        async fn signed_url(&self, file_path: &str) -> anyhow::Result<String> {
            self.requested.lock().unwrap().push(file_path.to_string());
            if self.failing.iter().any(|f| f == file_path) {
                anyhow::bail!("signing refused");
            }
            Ok(format!("signed://{file_path}"))
        }
    }

    fn catalog() -> MemoryCatalog {
        let mut lm317 = Part::new("LM317");
        lm317.file_path = Some("ds/lm317.pdf".into());
        let mut broken = Part::new("BROKEN");
        broken.file_path = Some("ds/broken.pdf".into());

        MemoryCatalog::new()
            .with_part(
                lm317,
                "c-lm317",
                vec![
                    Rule::new(Some("Power"), Some("ESSENTIAL"), "Input cap"),
                    Rule::new(Some("Layout"), None, "Short loop"),
                ],
            )
            .with_part(Part::new("NOFILE"), "c-nofile", vec![])
            .with_part(broken, "c-broken", vec![])
            .with_orphan_part(Part::new("ORPHAN"))
    }

    fn loader(
        repo: MemoryCatalog,
        urls: FakeUrls,
    ) -> (
        DataLoader,
        mpsc::Receiver<ViewerEvent>,
        Arc<MemoryCatalog>,
        Arc<FakeUrls>,
    ) {
        let (tx, rx) = mpsc::channel(16);
        let repo = Arc::new(repo);
        let urls = Arc::new(urls);
        (
            DataLoader::new(repo.clone(), urls.clone(), tx),
            rx,
            repo,
            urls,
        )
    }

    fn request(token: u64, part_id: &str) -> LoadRequest {
        LoadRequest {
            token,
            part_id: part_id.to_string(),
        }
    }

    #[tokio::test]
    async fn full_chain_publishes_data_then_url() {
        let (loader, mut rx, repo, _) = loader(catalog(), FakeUrls::default());
        loader.run(request(3, "LM317")).await;

        match rx.recv().await.unwrap() {
            ViewerEvent::PartDataLoaded {
                token, part, rules, ..
            } => {
                assert_eq!(token, 3);
                assert_eq!(part.part_id, "LM317");
                let contents: Vec<_> = rules.iter().map(|r| r.content.as_str()).collect();
                assert_eq!(contents, vec!["Input cap", "Short loop"]);
            }
            other => panic!("unexpected {other:?}"),
        }
        match rx.recv().await.unwrap() {
            ViewerEvent::PdfUrlReady { token, url, .. } => {
                assert_eq!(token, 3);
                assert_eq!(url, "signed://ds/lm317.pdf");
            }
            other => panic!("unexpected {other:?}"),
        }

        assert_eq!(
            repo.calls(),
            vec![
                "schematic_part:LM317",
                "schematic_checklist:LM317",
                "schematic_rule:c-lm317"
            ]
        );
    }

    #[tokio::test]
    async fn no_file_path_skips_url_fetch() {
        let (loader, mut rx, _, urls) = loader(catalog(), FakeUrls::default());
        loader.run(request(1, "NOFILE")).await;
        drop(loader);

        assert!(matches!(
            rx.recv().await,
            Some(ViewerEvent::PartDataLoaded { .. })
        ));
        assert!(rx.recv().await.is_none());
        assert!(urls.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_checklist_aborts_chain() {
        let (loader, mut rx, repo, _) = loader(catalog(), FakeUrls::default());
        loader.run(request(2, "ORPHAN")).await;
        drop(loader);

        match rx.recv().await.unwrap() {
            ViewerEvent::PartDataFailed { token, message } => {
                assert_eq!(token, 2);
                assert!(message.contains("schematic_checklist"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(rx.recv().await.is_none());
        // rules were never queried
        assert_eq!(repo.calls().len(), 2);
    }

    #[tokio::test]
    async fn unknown_part_fails() {
        let (loader, mut rx, _, _) = loader(catalog(), FakeUrls::default());
        loader.run(request(1, "NOPE")).await;
        assert!(matches!(
            rx.recv().await,
            Some(ViewerEvent::PartDataFailed { .. })
        ));
    }

    #[tokio::test]
    async fn signing_failure_follows_loaded_data() {
        let urls = FakeUrls {
            failing: vec!["ds/broken.pdf".into()],
            ..FakeUrls::default()
        };
        let (loader, mut rx, _, _) = loader(catalog(), urls);
        loader.run(request(5, "BROKEN")).await;

        assert!(matches!(
            rx.recv().await,
            Some(ViewerEvent::PartDataLoaded { token: 5, .. })
        ));
        match rx.recv().await.unwrap() {
            ViewerEvent::PdfUrlFailed { token, message } => {
                assert_eq!(token, 5);
                assert!(message.contains("signing refused"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_parts_reports_failure() {
        let (loader, mut rx, _, _) = loader(
            MemoryCatalog::new().failing_for("*"),
            FakeUrls::default(),
        );
        loader.spawn_list_parts().await.unwrap();
        assert!(matches!(
            rx.recv().await,
            Some(ViewerEvent::PartsListFailed { .. })
        ));
    }

    #[tokio::test]
    async fn closed_viewer_stops_chain() {
        let (loader, rx, _, urls) = loader(catalog(), FakeUrls::default());
        drop(rx);
        loader.run(request(1, "LM317")).await;
        assert!(urls.requested.lock().unwrap().is_empty());
    }
}
