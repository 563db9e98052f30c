//! Quote command implementation

use crate::booking::BookingRequest;
use crate::cli::input::read_json_list;
use crate::cli::output::{format_quotes_json, format_quotes_table, QuoteView};
use crate::cli::QuoteArgs;
use crate::config::EngineConfig;
use crate::pricing::FareCalculator;

/// Price every booking in the input file.
///
/// Any invalid booking fails the command with the booking id and every
/// violation in the message.
pub fn handle_quote(
    args: &QuoteArgs,
    config: &EngineConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let bookings: Vec<BookingRequest> = read_json_list(&args.bookings)?;
    if bookings.is_empty() {
        return Err(format!("No bookings found in {}", args.bookings.display()).into());
    }

    let calculator = FareCalculator::new(config.pricing.clone());
    let quotes = quote_all(&calculator, &bookings, args.estimate)?;

    if args.engine.json {
        Ok(format_quotes_json(&quotes)?)
    } else {
        Ok(format_quotes_table(&quotes))
    }
}

fn quote_all(
    calculator: &FareCalculator,
    bookings: &[BookingRequest],
    with_estimate: bool,
) -> Result<Vec<QuoteView>, Box<dyn std::error::Error>> {
    bookings
        .iter()
        .map(|booking| {
            let pricing = calculator
                .calculate_price(booking, booking.discount_percent)
                .map_err(|e| format!("Booking {}: {}", booking.id, e))?;
            let estimate = if with_estimate {
                Some(
                    calculator
                        .estimate_price(booking)
                        .map_err(|e| format!("Booking {}: {}", booking.id, e))?,
                )
            } else {
                None
            };
            Ok(QuoteView {
                booking_id: booking.id.clone(),
                pricing,
                estimate,
            })
        })
        .collect()
}
