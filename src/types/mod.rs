mod errors;
mod milliunits;
#[cfg(test)]
mod tests;

pub use milliunits::Milliunits;

pub type LedgerAccountId = String;
pub type ImportId = String;
