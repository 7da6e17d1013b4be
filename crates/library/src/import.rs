use crate::error::Result;
use crate::fetcher::CatalogFetcher;
use crate::reconcile::reconcile_detailed;
use crate::store::ItemStore;
use log::{debug, info};
use mediashelf_core::{Item, ItemFilter, MediaType};

/// Catalog import options
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Compute what would be imported without writing anything
    pub dry_run: bool,
    /// Flag created items as present in the external application
    pub mark_in_app: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            mark_in_app: true,
        }
    }
}

impl ImportOptions {
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }
}

/// Summary of one import run
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Name of the fetcher that supplied the records
    pub source: String,
    /// Records returned by the fetcher
    pub fetched: usize,
    /// Items created (or that would be created, in a dry run)
    pub created: Vec<Item>,
    pub skipped_existing: usize,
    pub skipped_duplicates: usize,
    pub dry_run: bool,
}

impl ImportReport {
    pub fn created_count(&self) -> usize {
        self.created.len()
    }
}

/// Runs fetch, reconcile and save as one pass
pub struct BookImporter;

impl BookImporter {
    /// Imports new books from `fetcher` into `store`
    ///
    /// A failed read of the existing catalog aborts before anything is
    /// staged. Nothing is saved when there is nothing to create.
    pub async fn run<F, S>(
        fetcher: &F,
        store: &mut S,
        options: &ImportOptions,
    ) -> Result<ImportReport>
    where
        F: CatalogFetcher + ?Sized,
        S: ItemStore + ?Sized,
    {
        let records = fetcher.fetch().await;
        debug!("{} returned {} records", fetcher.name(), records.len());

        let existing = store
            .fetch_all(&ItemFilter::MediaType(MediaType::Book))
            .await?;

        let plan = reconcile_detailed(&records, &existing);

        let mut report = ImportReport {
            source: fetcher.name().to_string(),
            fetched: records.len(),
            created: Vec::with_capacity(plan.to_create.len()),
            skipped_existing: plan.skipped_existing,
            skipped_duplicates: plan.skipped_duplicates,
            dry_run: options.dry_run,
        };

        if options.dry_run {
            report.created = plan
                .to_create
                .into_iter()
                .map(|mut fields| {
                    fields.is_in_app = options.mark_in_app;
                    Item::from_new(fields)
                })
                .collect();
        } else if !plan.to_create.is_empty() {
            for mut fields in plan.to_create {
                fields.is_in_app = options.mark_in_app;
                report.created.push(store.create(fields));
            }
            store.save().await?;
        }

        info!(
            "Import from {}{}: {} fetched, {} new, {} already present, {} duplicates",
            report.source,
            if report.dry_run { " (dry run)" } else { "" },
            report.fetched,
            report.created_count(),
            report.skipped_existing,
            report.skipped_duplicates
        );

        Ok(report)
    }
}
