use countplot::{Plot, SHARE, ShareOptions, value_share};
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

  let options = ShareOptions::default();
  let shares = value_share(&full, &accepted, "product_name", options)?;

  let mut plot = Plot::new();
  plot.title("Accepted products");
  plot.x.title(&format!("product names with more than {} entries", options.count_threshold));
  plot.y.title("share of occurrences").min(0.0);

  plot.bar_chart(shares.column("product_name")?, shares.column(SHARE)?);

  plot.show();

  Ok(())
}
