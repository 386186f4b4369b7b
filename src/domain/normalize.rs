use super::entities::{ConvertedListing, Listing};
use super::generator::MILES_TO_KM;

pub fn price_to_eur(price_usd: u32, fx_rate: f64) -> f64 {
    price_usd as f64 * fx_rate
}

/// Miles to whole kilometres, ties rounded to even.
pub fn miles_to_km(miles: u32) -> u32 {
    (miles as f64 * MILES_TO_KM).round_ties_even() as u32
}

/// Adds EUR price and km mileage to every US row.
pub fn convert_us_listings(rows: &[Listing], fx_rate: f64) -> Vec<ConvertedListing> {
    rows.iter()
        .map(|row| ConvertedListing {
            listing: row.clone(),
            price_eur: price_to_eur(row.price, fx_rate),
            mileage_km: miles_to_km(row.mileage),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ConditionFilter, Market, YearRange};
    use crate::domain::generator::{generate, GenerateRequest};

    #[test]
    fn conversion_holds_for_every_row() {
        let rows = generate(&GenerateRequest::new(
            Market::Us,
            "Audi RS4",
            YearRange::new(2000, 2010),
            150_000,
            ConditionFilter::All,
        ));
        let fx_rate = 0.9137;
        let converted = convert_us_listings(&rows, fx_rate);

        assert_eq!(converted.len(), rows.len());
        for (row, out) in rows.iter().zip(&converted) {
            assert_eq!(&out.listing, row);
            assert_eq!(out.price_eur, row.price as f64 * fx_rate);
            assert_eq!(out.mileage_km, (row.mileage as f64 * 1.609).round_ties_even() as u32);
        }
    }

    #[test]
    fn miles_round_to_nearest_km() {
        assert_eq!(miles_to_km(3_000), 4_827);
        assert_eq!(miles_to_km(10_001), 16_092);
        // 500 mi is exactly 804.5 km.
        assert_eq!(miles_to_km(500), 804);
    }

    #[test]
    fn empty_table_converts_to_empty() {
        assert!(convert_us_listings(&[], 0.92).is_empty());
    }
}
