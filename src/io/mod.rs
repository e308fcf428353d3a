/// CSV export of tick results.
pub mod export;
