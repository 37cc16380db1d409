mod fetcher;
mod webhook;

pub use fetcher::HttpDocumentFetcher;
pub use webhook::HttpWebhookSink;
