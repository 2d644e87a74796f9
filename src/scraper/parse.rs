//! HTML parsing for Jumia search result pages.
//!
//! Uses the scraper crate to walk the product cards. Card-level problems never
//! abort the page: the card is skipped and recorded in the report.

use super::{ItemSkip, Listing, ScrapeFailure, ScrapeReport};
use ::scraper::{ElementRef, Html, Selector};
use regex::Regex;
use reqwest::Url;
use std::sync::LazyLock;

#[allow(clippy::expect_used)] // Literal pattern, checked by the tests below
static PRICE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"KSh\s*([\d,]+)").expect("price pattern is valid"));

#[allow(clippy::expect_used)] // Literal patterns, checked by the tests below
static SIZE_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)(\d+(?:\.\d+)?\s*(?:kg|g|ml|l))").expect("size pattern is valid"),
        Regex::new(r"(?i)(\d+(?:\.\d+)?\s*(?:litre|liter|gram)s?)").expect("size pattern is valid"),
    ]
});

/// Size label used when a title carries no recognizable pack size.
pub const UNKNOWN_SIZE: &str = "Unknown";

struct CardSelectors {
    card: Selector,
    name: Selector,
    price: Selector,
    link: Selector,
}

impl CardSelectors {
    fn new() -> Result<Self, ScrapeFailure> {
        let parse = |css: &str| {
            Selector::parse(css).map_err(|e| ScrapeFailure::Parse {
                message: format!("invalid selector '{css}': {e}"),
            })
        };
        Ok(Self {
            card: parse("article.prd")?,
            name: parse("h3.name")?,
            price: parse("div.prc")?,
            link: parse("a")?,
        })
    }
}

/// Parses a search result page into listings.
///
/// At most `max_results` cards are examined; skipped cards count toward the cap.
#[must_use]
pub fn parse_search_page(
    html: &str,
    base_url: &str,
    competitor: &str,
    max_results: usize,
) -> ScrapeReport {
    let base = match Url::parse(base_url) {
        Ok(base) => base,
        Err(e) => {
            return ScrapeReport::failed(ScrapeFailure::Parse {
                message: format!("invalid base URL '{base_url}': {e}"),
            });
        }
    };
    let selectors = match CardSelectors::new() {
        Ok(selectors) => selectors,
        Err(failure) => return ScrapeReport::failed(failure),
    };

    let document = Html::parse_document(html);
    let mut report = ScrapeReport::default();

    for (index, card) in document.select(&selectors.card).take(max_results).enumerate() {
        match parse_card(card, &selectors, &base, competitor, index) {
            Ok(listing) => report.listings.push(listing),
            Err(skip) => report.skipped.push(skip),
        }
    }
    report
}

fn parse_card(
    card: ElementRef<'_>,
    selectors: &CardSelectors,
    base: &Url,
    competitor: &str,
    index: usize,
) -> Result<Listing, ItemSkip> {
    let name = card
        .select(&selectors.name)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or(ItemSkip::MissingName { index })?;

    let price_text = card
        .select(&selectors.price)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .ok_or_else(|| ItemSkip::MissingPrice { name: name.clone() })?;

    let price = parse_price(&price_text).ok_or_else(|| ItemSkip::UnparseablePrice {
        name: name.clone(),
        text: price_text.clone(),
    })?;

    let url = card
        .select(&selectors.link)
        .next()
        .map(|a| {
            let href = a.value().attr("href").unwrap_or_default();
            base.join(href).map_or_else(|_| href.to_string(), String::from)
        })
        .unwrap_or_default();

    Ok(Listing {
        size_info: extract_size_info(&name),
        product_name: name,
        competitor: competitor.to_string(),
        price,
        url,
    })
}

/// Extracts a shilling amount such as `KSh 1,299` from a price label.
#[must_use]
pub fn parse_price(text: &str) -> Option<f64> {
    let digits = PRICE_PATTERN.captures(text)?.get(1)?.as_str().replace(',', "");
    digits.parse::<f64>().ok()
}

/// Pulls a pack size like `500ml`, `1.5 L` or `2 litres` out of a listing title.
#[must_use]
pub fn extract_size_info(product_name: &str) -> String {
    SIZE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(product_name))
        .and_then(|captures| captures.get(1))
        .map_or_else(|| UNKNOWN_SIZE.to_string(), |m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    const BASE: &str = "https://www.jumia.co.ke";

    const SEARCH_PAGE: &str = r#"
        <html><body><div class="-paxs row _no-g _4cl-3cm-shs">
          <article class="prd _fb col c-prd">
            <a class="core" href="/omo-hand-washing-powder-1kg-123.html">
              <div class="info">
                <h3 class="name">OMO Hand Washing Powder 1kg</h3>
                <div class="prc">KSh 1,299</div>
              </div>
            </a>
          </article>
          <article class="prd _fb col c-prd">
            <a class="core" href="https://www.jumia.co.ke/ariel-liquid.html">
              <h3 class="name">Ariel Liquid Detergent 2 Litres</h3>
              <div class="prc">KSh 850 - KSh 900</div>
            </a>
          </article>
          <article class="prd _fb col c-prd">
            <h3 class="name">Sunlight Bar Soap</h3>
            <div class="prc">KSh 120</div>
          </article>
          <article class="prd _fb col c-prd">
            <a href="/no-name.html"><div class="prc">KSh 10</div></a>
          </article>
          <article class="prd _fb col c-prd">
            <a href="/no-price.html"><h3 class="name">Mystery Soap</h3></a>
          </article>
          <article class="prd _fb col c-prd">
            <a href="/call.html"><h3 class="name">Jik Bleach 750ml</h3><div class="prc">Call for price</div></a>
          </article>
        </div></body></html>
    "#;

    #[test]
    fn test_parse_search_page() {
        let report = parse_search_page(SEARCH_PAGE, BASE, "Jumia", 10);
        assert!(report.failure.is_none());
        assert_eq!(report.listings.len(), 3);

        let omo = &report.listings[0];
        assert_eq!(omo.product_name, "OMO Hand Washing Powder 1kg");
        assert_eq!(omo.price, 1299.0);
        assert_eq!(omo.url, "https://www.jumia.co.ke/omo-hand-washing-powder-1kg-123.html");
        assert_eq!(omo.size_info, "1kg");
        assert_eq!(omo.competitor, "Jumia");

        let ariel = &report.listings[1];
        assert_eq!(ariel.price, 850.0);
        assert_eq!(ariel.url, "https://www.jumia.co.ke/ariel-liquid.html");
        assert_eq!(ariel.size_info, "2 L");

        // No anchor in the card
        assert_eq!(report.listings[2].url, "");
        assert_eq!(report.listings[2].size_info, UNKNOWN_SIZE);

        assert_eq!(
            report.skipped,
            vec![
                ItemSkip::MissingName { index: 3 },
                ItemSkip::MissingPrice {
                    name: "Mystery Soap".to_string()
                },
                ItemSkip::UnparseablePrice {
                    name: "Jik Bleach 750ml".to_string(),
                    text: "Call for price".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_max_results_caps_examined_cards() {
        let report = parse_search_page(SEARCH_PAGE, BASE, "Jumia", 2);
        assert_eq!(report.listings.len(), 2);
        assert!(report.skipped.is_empty());

        let none = parse_search_page(SEARCH_PAGE, BASE, "Jumia", 0);
        assert!(none.listings.is_empty());
    }

    #[test]
    fn test_page_without_cards() {
        let report = parse_search_page("<html><body>No results</body></html>", BASE, "Jumia", 10);
        assert!(report.listings.is_empty());
        assert!(report.skipped.is_empty());
        assert!(report.failure.is_none());
    }

    #[test]
    fn test_invalid_base_url_is_parse_failure() {
        let report = parse_search_page(SEARCH_PAGE, "not a url", "Jumia", 10);
        assert!(matches!(report.failure, Some(ScrapeFailure::Parse { .. })));
        assert!(report.listings.is_empty());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("KSh 1,299"), Some(1299.0));
        assert_eq!(parse_price("KSh450"), Some(450.0));
        assert_eq!(parse_price("Now KSh 12,345,678 only"), Some(12_345_678.0));
        assert_eq!(parse_price("KSh ,"), None);
        assert_eq!(parse_price("1,299"), None);
        assert_eq!(parse_price("ksh 100"), None);
    }

    #[test]
    fn test_extract_size_info() {
        assert_eq!(extract_size_info("Omo 500g Pack"), "500g");
        assert_eq!(extract_size_info("Msafi 1.5 L Bottle"), "1.5 L");
        assert_eq!(extract_size_info("Harpic 750ML"), "750ML");
        assert_eq!(extract_size_info("Sunlight 2KG"), "2KG");
        assert_eq!(extract_size_info("Bar Soap"), UNKNOWN_SIZE);
        assert_eq!(extract_size_info("Pack of 3 Bars"), UNKNOWN_SIZE);
    }
}
