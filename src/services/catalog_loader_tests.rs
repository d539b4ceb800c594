// src/services/catalog_loader_tests.rs
//
// Catalog Loader Tests
//
// The fake client below serves a fixed set of records and can fail,
// delay or hold individual references behind a gate, which lets the
// tests pin down batch ordering and session superseding.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::predicate::eq;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Semaphore;

    use crate::domain::{CatalogIndex, CatalogItem, IndexEntry};
    use crate::error::{AppError, AppResult};
    use crate::events::EventBus;
    use crate::integrations::{CatalogClient, MockCatalogClient};
    use crate::services::catalog_loader::{CatalogLoader, LoadProgress, LoaderConfig};

    // ========================================================================
    // TEST HELPERS
    // ========================================================================

    fn detail_ref(id: u32) -> String {
        format!("https://pokeapi.test/api/v2/pokemon/{}/", id)
    }

    fn pokemon(id: u32) -> CatalogItem {
        CatalogItem::new(id, format!("mon-{}", id), vec!["normal".to_string()]).with_size(id, id * 10)
    }

    fn index_of<I: IntoIterator<Item = u32>>(ids: I) -> CatalogIndex {
        let entries: Vec<IndexEntry> = ids
            .into_iter()
            .map(|id| IndexEntry::new(format!("mon-{}", id), detail_ref(id)))
            .collect();
        CatalogIndex::new(entries.len(), entries)
    }

    fn id_from_ref(detail_ref: &str) -> Option<u32> {
        detail_ref.trim_end_matches('/').rsplit('/').next()?.parse().ok()
    }

    struct FakeCatalog {
        known: HashSet<u32>,
        failing: HashSet<u32>,
        gated: HashSet<u32>,
        delays: HashMap<u32, u64>,
        gate: Arc<Semaphore>,
        detail_calls: AtomicUsize,
        // index and by-id requests parked behind a second gate
        hold_index: bool,
        held_by_id: HashSet<u32>,
        hold: Arc<Semaphore>,
        index_calls: AtomicUsize,
        by_id_calls: AtomicUsize,
    }

    impl FakeCatalog {
        fn new<I: IntoIterator<Item = u32>>(ids: I) -> Self {
            Self {
                known: ids.into_iter().collect(),
                failing: HashSet::new(),
                gated: HashSet::new(),
                delays: HashMap::new(),
                gate: Arc::new(Semaphore::new(0)),
                detail_calls: AtomicUsize::new(0),
                hold_index: false,
                held_by_id: HashSet::new(),
                hold: Arc::new(Semaphore::new(0)),
                index_calls: AtomicUsize::new(0),
                by_id_calls: AtomicUsize::new(0),
            }
        }

        fn failing<I: IntoIterator<Item = u32>>(mut self, ids: I) -> Self {
            self.failing.extend(ids);
            self
        }

        fn gated<I: IntoIterator<Item = u32>>(mut self, ids: I) -> Self {
            self.gated.extend(ids);
            self
        }

        fn delayed(mut self, id: u32, millis: u64) -> Self {
            self.delays.insert(id, millis);
            self
        }

        fn holding_index(mut self) -> Self {
            self.hold_index = true;
            self
        }

        fn holding_by_id<I: IntoIterator<Item = u32>>(mut self, ids: I) -> Self {
            self.held_by_id.extend(ids);
            self
        }

        fn open_gate(&self) {
            self.gate.add_permits(1000);
        }

        fn release_held(&self) {
            self.hold.add_permits(1000);
        }

        async fn wait_held(&self) -> AppResult<()> {
            let _permit = self
                .hold
                .acquire()
                .await
                .map_err(|e| AppError::Other(e.to_string()))?;
            Ok(())
        }

        async fn lookup(&self, id: u32) -> AppResult<CatalogItem> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);

            if self.gated.contains(&id) {
                let _permit = self
                    .gate
                    .acquire()
                    .await
                    .map_err(|e| AppError::Other(e.to_string()))?;
            }
            if let Some(millis) = self.delays.get(&id) {
                tokio::time::sleep(Duration::from_millis(*millis)).await;
            }
            if self.failing.contains(&id) || !self.known.contains(&id) {
                return Err(AppError::Http {
                    status: Some(500),
                    message: format!("upstream error for {}", id),
                });
            }
            Ok(pokemon(id))
        }
    }

    #[async_trait]
    impl CatalogClient for FakeCatalog {
        async fn list_index(&self, limit: u32) -> AppResult<CatalogIndex> {
            self.index_calls.fetch_add(1, Ordering::SeqCst);
            if self.hold_index {
                self.wait_held().await?;
            }
            let mut ids: Vec<u32> = self.known.iter().copied().collect();
            ids.sort();
            ids.truncate(limit as usize);
            Ok(index_of(ids))
        }

        async fn fetch_detail_by_ref(&self, detail_ref: &str) -> AppResult<CatalogItem> {
            let id = id_from_ref(detail_ref).ok_or_else(|| AppError::Http {
                status: Some(404),
                message: detail_ref.to_string(),
            })?;
            self.lookup(id).await
        }

        async fn fetch_detail_by_id(&self, id: u32) -> AppResult<CatalogItem> {
            self.by_id_calls.fetch_add(1, Ordering::SeqCst);
            if self.held_by_id.contains(&id) {
                self.wait_held().await?;
                // distinguishable from the copy the batch loader merges
                let mut item = self.lookup(id).await?;
                item.name = format!("fresh-{}", id);
                return Ok(item);
            }
            self.lookup(id).await
        }

        async fn list_categories(&self) -> AppResult<Vec<String>> {
            Ok(vec!["normal".to_string()])
        }
    }

    fn loader_with(
        client: Arc<dyn CatalogClient>,
        initial_batch_size: usize,
        batch_size: usize,
    ) -> (CatalogLoader, Arc<EventBus>) {
        let bus = Arc::new(EventBus::new());
        let config = LoaderConfig {
            index_limit: 1000,
            initial_batch_size,
            batch_size,
        };
        (CatalogLoader::new(client, bus.clone(), config), bus)
    }

    async fn wait_for_calls(counter: &AtomicUsize) {
        while counter.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
    }

    fn ids(items: &[CatalogItem]) -> Vec<u32> {
        items.iter().map(|i| i.id).collect()
    }

    fn event_types(bus: &EventBus) -> Vec<String> {
        bus.get_event_log().into_iter().map(|e| e.event_type).collect()
    }

    // ========================================================================
    // PROGRESSIVE LOADING
    // ========================================================================

    #[tokio::test]
    async fn test_initial_batch_returns_before_remainder() {
        let fake = Arc::new(FakeCatalog::new(1..=10).gated(5..=10));
        let (loader, bus) = loader_with(fake.clone(), 4, 3);

        let snapshot = loader.start_load(index_of(1..=10)).await.unwrap();

        assert_eq!(snapshot.items.len(), 4);
        assert_eq!(snapshot.progress.total, 10);
        assert_eq!(snapshot.progress.loaded, 4);
        assert!(snapshot.is_loading);
        assert!(snapshot.error.is_none());

        fake.open_gate();
        loader.wait_for_background().await;

        let done = loader.snapshot();
        assert_eq!(done.items.len(), 10);
        assert!(done.progress.is_complete());
        assert!(!done.is_loading);

        let events = event_types(&bus);
        assert_eq!(events.first().map(String::as_str), Some("CatalogLoadStarted"));
        assert_eq!(events.last().map(String::as_str), Some("CatalogLoadCompleted"));
    }

    #[tokio::test]
    async fn test_item_failures_are_dropped() {
        let fake = Arc::new(FakeCatalog::new(1..=6).failing([2, 5]));
        let (loader, _) = loader_with(fake, 3, 2);

        loader.start_load(index_of(1..=6)).await.unwrap();
        loader.wait_for_background().await;

        let snapshot = loader.snapshot();
        let mut loaded = ids(&snapshot.items);
        loaded.sort();
        assert_eq!(loaded, vec![1, 3, 4, 6]);
        assert_eq!(snapshot.progress.loaded, snapshot.items.len());
        assert!(snapshot.progress.loaded <= snapshot.progress.total);
        assert!(!snapshot.is_loading);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_failed_batch_is_skipped() {
        let fake = Arc::new(FakeCatalog::new(1..=7).failing([4, 5]));
        let (loader, bus) = loader_with(fake, 3, 2);

        loader.start_load(index_of(1..=7)).await.unwrap();
        loader.wait_for_background().await;

        let mut loaded = ids(&loader.items());
        loaded.sort();
        assert_eq!(loaded, vec![1, 2, 3, 6, 7]);

        let events = event_types(&bus);
        assert!(events.iter().any(|e| e == "CatalogBatchSkipped"));
        assert_eq!(events.last().map(String::as_str), Some("CatalogLoadCompleted"));
    }

    #[tokio::test]
    async fn test_batches_merge_in_index_order() {
        let fake = Arc::new(
            FakeCatalog::new(1..=9)
                .delayed(1, 30)
                .delayed(4, 30)
                .delayed(7, 30),
        );
        let (loader, _) = loader_with(fake, 3, 3);

        loader.start_load(index_of(1..=9)).await.unwrap();
        loader.wait_for_background().await;

        let loaded = ids(&loader.items());
        assert_eq!(loaded.len(), 9);
        for (position, chunk) in loaded.chunks(3).enumerate() {
            let first = position as u32 * 3 + 1;
            let mut chunk = chunk.to_vec();
            // the slow item arrives last within its batch
            assert_eq!(chunk[2], first);
            chunk.sort();
            assert_eq!(chunk, vec![first, first + 1, first + 2]);
        }
    }

    #[tokio::test]
    async fn test_duplicate_index_entries_are_merged_once() {
        let fake = Arc::new(FakeCatalog::new(1..=3));
        let (loader, _) = loader_with(fake, 2, 2);

        let mut index = index_of([1, 2, 2, 3, 1]);
        index.entries.push(IndexEntry::new("mon-3", detail_ref(3)));

        loader.start_load(index).await.unwrap();
        loader.wait_for_background().await;

        let snapshot = loader.snapshot();
        let mut loaded = ids(&snapshot.items);
        loaded.sort();
        assert_eq!(loaded, vec![1, 2, 3]);
        assert_eq!(snapshot.progress.loaded, 3);
        assert_eq!(snapshot.progress.total, 6);
    }

    #[tokio::test]
    async fn test_load_catalog_uses_index_from_client() {
        let fake = Arc::new(FakeCatalog::new(1..=5));
        let (loader, _) = loader_with(fake, 2, 2);

        let first_page = loader.load_catalog().await.unwrap();
        assert_eq!(first_page.items.len(), 2);

        loader.wait_for_background().await;
        assert_eq!(loader.progress().loaded, 5);
        assert_eq!(loader.categories().await.unwrap(), vec!["normal".to_string()]);
    }

    // ========================================================================
    // TERMINAL ERRORS
    // ========================================================================

    #[tokio::test]
    async fn test_initial_batch_total_failure_is_terminal() {
        let fake = Arc::new(FakeCatalog::new(1..=4).failing([1, 2]));
        let (loader, bus) = loader_with(fake.clone(), 2, 2);

        let err = loader.start_load(index_of(1..=4)).await.unwrap_err();

        assert!(matches!(err, AppError::InitialBatchFailed { attempted: 2 }));
        assert!(err.is_retryable());
        assert!(loader.error().is_some());
        assert!(!loader.is_loading());
        assert!(loader.items().is_empty());
        assert!(event_types(&bus).iter().any(|e| e == "CatalogLoadFailed"));

        // the remainder is never requested
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(fake.detail_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_index_is_rejected() {
        let fake = Arc::new(FakeCatalog::new(1..=3));
        let (loader, _) = loader_with(fake, 2, 2);

        let err = loader.start_load(CatalogIndex::default()).await.unwrap_err();

        assert!(matches!(err, AppError::Domain(_)));
        assert_eq!(loader.generation(), 0);
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn test_index_fetch_failure() {
        let mut mock = MockCatalogClient::new();
        mock.expect_list_index().with(eq(1000)).times(1).returning(|_| {
            Err(AppError::Http {
                status: Some(503),
                message: "Service Unavailable".to_string(),
            })
        });
        mock.expect_fetch_detail_by_ref().never();

        let (loader, bus) = loader_with(Arc::new(mock), 50, 50);
        let err = loader.load_catalog().await.unwrap_err();

        assert!(matches!(err, AppError::IndexFetch(_)));
        assert!(err.is_retryable());

        let snapshot = loader.snapshot();
        assert!(snapshot.items.is_empty());
        assert!(!snapshot.is_loading);
        assert!(snapshot.error.unwrap().contains("Service Unavailable"));
        assert!(event_types(&bus).iter().any(|e| e == "CatalogLoadFailed"));
    }

    // ========================================================================
    // SUPERSEDING AND CANCELLATION
    // ========================================================================

    #[tokio::test]
    async fn test_superseded_remainder_never_merges() {
        let fake = Arc::new(FakeCatalog::new((1..=6).chain(101..=104)).gated(3..=6));
        let (loader, _) = loader_with(fake.clone(), 2, 2);

        let first = loader.start_load(index_of(1..=6)).await.unwrap();
        assert_eq!(ids(&first.items).len(), 2);

        loader.start_load(index_of(101..=104)).await.unwrap();
        fake.open_gate();
        loader.wait_for_background().await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        let mut loaded = ids(&loader.items());
        loaded.sort();
        assert_eq!(loaded, vec![101, 102, 103, 104]);
        assert_eq!(loader.progress().total, 4);
        assert_eq!(loader.generation(), 2);
    }

    #[tokio::test]
    async fn test_superseded_initial_batch_is_discarded() {
        let fake = Arc::new(FakeCatalog::new([1, 2, 101, 102]).gated([1, 2]));
        let (loader, _) = loader_with(fake.clone(), 2, 2);
        let loader = Arc::new(loader);

        let stale = {
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { loader.start_load(index_of([1, 2])).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let fresh = loader.start_load(index_of([101, 102])).await.unwrap();
        assert_eq!(fresh.generation, 2);

        fake.open_gate();
        let stale_result = stale.await.unwrap();
        assert!(matches!(stale_result, Err(AppError::LoadCancelled { generation: 1 })));

        let mut loaded = ids(&loader.items());
        loaded.sort();
        assert_eq!(loaded, vec![101, 102]);
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn test_cancel_stops_background_merges() {
        let fake = Arc::new(FakeCatalog::new(1..=6).gated(3..=6));
        let (loader, _) = loader_with(fake.clone(), 2, 2);

        loader.start_load(index_of(1..=6)).await.unwrap();
        loader.cancel();
        fake.open_gate();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(loader.items().len(), 2);
        assert!(!loader.is_loading());
        assert_eq!(loader.generation(), 2);
    }

    // ========================================================================
    // FETCH ON DEMAND
    // ========================================================================

    #[tokio::test]
    async fn test_fetch_one_returns_loaded_item_without_network() {
        let mut mock = MockCatalogClient::new();
        mock.expect_fetch_detail_by_ref()
            .times(2)
            .returning(|r| Ok(pokemon(id_from_ref(r).unwrap_or(0))));
        mock.expect_fetch_detail_by_id().never();

        let (loader, _) = loader_with(Arc::new(mock), 2, 2);
        loader.start_load(index_of([1, 2])).await.unwrap();

        let item = loader.fetch_one(2).await.unwrap();
        assert_eq!(item.id, 2);
        assert_eq!(loader.items().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_one_merges_once() {
        let mut mock = MockCatalogClient::new();
        mock.expect_fetch_detail_by_id()
            .with(eq(150))
            .times(1)
            .returning(|id| Ok(pokemon(id)));

        let (loader, _) = loader_with(Arc::new(mock), 2, 2);

        assert_eq!(loader.fetch_one(150).await.unwrap().id, 150);
        assert_eq!(loader.fetch_one(150).await.unwrap().id, 150);

        let progress = loader.progress();
        assert_eq!(loader.items().len(), 1);
        assert_eq!(progress.loaded, 1);
        assert_eq!(progress.total, 1);
    }

    #[tokio::test]
    async fn test_fetch_one_during_index_fetch_keeps_loaded_within_total() {
        let fake = Arc::new(FakeCatalog::new([1, 7]).holding_index());
        let config = LoaderConfig {
            index_limit: 1,
            initial_batch_size: 2,
            batch_size: 2,
        };
        let loader = Arc::new(CatalogLoader::new(fake.clone(), Arc::new(EventBus::new()), config));

        let loading = {
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { loader.load_catalog().await })
        };
        wait_for_calls(&fake.index_calls).await;

        assert_eq!(loader.fetch_one(7).await.unwrap().id, 7);

        fake.release_held();
        let snapshot = loading.await.unwrap().unwrap();

        let mut loaded = ids(&snapshot.items);
        loaded.sort();
        assert_eq!(loaded, vec![1, 7]);
        assert_eq!(snapshot.progress, LoadProgress { total: 2, loaded: 2 });
        assert!(snapshot.progress.is_complete());
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn test_fetch_one_yields_to_item_merged_by_background_batch() {
        let fake = Arc::new(FakeCatalog::new(1..=4).gated(3..=4).holding_by_id([3]));
        let (loader, _) = loader_with(fake.clone(), 2, 2);
        let loader = Arc::new(loader);

        loader.start_load(index_of(1..=4)).await.unwrap();

        let on_demand = {
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { loader.fetch_one(3).await })
        };
        wait_for_calls(&fake.by_id_calls).await;

        fake.open_gate();
        loader.wait_for_background().await;
        fake.release_held();

        let item = on_demand.await.unwrap().unwrap();
        assert_eq!(item.name, "mon-3");

        let items = loader.items();
        assert_eq!(items.iter().filter(|i| i.id == 3).count(), 1);
        assert_eq!(loader.progress().loaded, items.len());
        assert_eq!(loader.progress(), LoadProgress { total: 4, loaded: 4 });
    }

    #[tokio::test]
    async fn test_fetch_one_from_superseded_session_is_not_merged() {
        let fake = Arc::new(FakeCatalog::new([1, 2, 9]).holding_by_id([9]));
        let (loader, _) = loader_with(fake.clone(), 2, 2);
        let loader = Arc::new(loader);

        loader.start_load(index_of([1, 2])).await.unwrap();

        let on_demand = {
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { loader.fetch_one(9).await })
        };
        wait_for_calls(&fake.by_id_calls).await;

        loader.start_load(index_of([1, 2])).await.unwrap();
        fake.release_held();

        let item = on_demand.await.unwrap().unwrap();
        assert_eq!(item.id, 9);
        assert_eq!(item.name, "fresh-9");

        let mut loaded = ids(&loader.items());
        loaded.sort();
        assert_eq!(loaded, vec![1, 2]);
        assert_eq!(loader.progress(), LoadProgress { total: 2, loaded: 2 });
        assert_eq!(loader.generation(), 2);
    }

    #[tokio::test]
    async fn test_fetch_one_propagates_client_error() {
        let mut mock = MockCatalogClient::new();
        mock.expect_fetch_detail_by_id().returning(|_| {
            Err(AppError::Http {
                status: Some(404),
                message: "Not Found".to_string(),
            })
        });

        let (loader, _) = loader_with(Arc::new(mock), 2, 2);
        let err = loader.fetch_one(99999).await.unwrap_err();

        assert!(matches!(err, AppError::Http { status: Some(404), .. }));
        assert!(loader.items().is_empty());
    }
}
