use countplot::{ACCEPTED, Plot, SHARE, ShareOptions, merge_labeled, value_share};
use polars::prelude::*;

fn repeat(counts: &[(&'static str, usize)]) -> Vec<&'static str> {
  counts.iter().flat_map(|(value, n)| std::iter::repeat(*value).take(*n)).collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  env_logger::init();

  let full = df! {
    "product_name" => repeat(&[("espresso", 48), ("latte", 33), ("cortado", 19), ("mocha", 7)]),
  }?;
  let accepted = df! {
    "product_name" => repeat(&[("espresso", 31), ("latte", 12), ("mocha", 3)]),
  }?;
  let rejected = df! {
    "product_name" => repeat(&[("espresso", 17), ("latte", 21), ("cortado", 11)]),
  }?;

  let options = ShareOptions { count_threshold: 5, percent_threshold: 0.05 };
  let accepted_shares = value_share(&full, &accepted, "product_name", options)?;
  let rejected_shares = value_share(&full, &rejected, "product_name", options)?;

  let merged = merge_labeled(&accepted_shares, &rejected_shares)?;

  let mut plot = Plot::new();
  plot.title("Accepted or rejected based on product_name");
  plot.y.title("share of occurrences").min(0.0);

  plot.grouped_bar_chart(
    merged.column("product_name")?,
    merged.column(SHARE)?,
    merged.column(ACCEPTED)?,
  );

  plot.show();

  Ok(())
}
