use tracing::{error, info};

use crate::collections::CollectionConfig;
use crate::page_source::PageSource;
use crate::parser::parse_collection_with_links;
use crate::types::{CollectionError, Record};

#[derive(Debug)]
pub struct CollectionFailure {
    pub slug: String,
    pub error: CollectionError,
}

/// Records of every collection that parsed, in collection order then
/// emission order, and the collections that were aborted.
#[derive(Debug, Default)]
pub struct Aggregate {
    pub records: Vec<Record>,
    pub failures: Vec<CollectionFailure>,
    /// Locators of the book pages the records were walked from.
    pub walked_links: Vec<String>,
}

impl Aggregate {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of one collection as reported to an observer.
pub enum CollectionOutcome<'a> {
    Parsed(&'a [Record]),
    Failed(&'a CollectionError),
}

pub fn parse_all(source: &dyn PageSource, configs: &[CollectionConfig]) -> Aggregate {
    parse_all_with(source, configs, |_, _| {})
}

/// Parse each collection in turn, calling `observer` after each one.
pub fn parse_all_with<F>(source: &dyn PageSource, configs: &[CollectionConfig], mut observer: F) -> Aggregate
where
    F: FnMut(&CollectionConfig, CollectionOutcome<'_>),
{
    let mut aggregate = Aggregate::default();

    for config in configs {
        match parse_collection_with_links(config, source) {
            Ok((records, links)) => {
                info!("{}: {} records", config.slug, records.len());
                observer(config, CollectionOutcome::Parsed(&records));
                aggregate.walked_links.extend(links.into_iter().map(|l| l.locator));
                aggregate.records.extend(records);
            }
            Err(e) => {
                error!("{}: collection aborted: {}", config.slug, e);
                observer(config, CollectionOutcome::Failed(&e));
                aggregate.failures.push(CollectionFailure {
                    slug: config.slug.to_string(),
                    error: e,
                });
            }
        }
    }

    aggregate
}
