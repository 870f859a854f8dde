//! Strings printed on generated samples. `now` is passed in so a seeded run
//! stays reproducible.

use chrono::{NaiveDateTime, TimeDelta};
use rand::Rng;

const EXPIRY_DAYS: std::ops::RangeInclusive<i64> = 30..=365;
const CLOCK_MINUTES: std::ops::RangeInclusive<i64> = 0..=1440;

/// `DD/MM/YYYY`, 30 to 365 days after `now`.
pub fn expiry_date<R: Rng + ?Sized>(now: NaiveDateTime, rng: &mut R) -> String {
    let days = rng.random_range(EXPIRY_DAYS);
    (now + TimeDelta::days(days)).format("%d/%m/%Y").to_string()
}

/// `HH:MM`, up to a day after `now`.
pub fn clock_time<R: Rng + ?Sized>(now: NaiveDateTime, rng: &mut R) -> String {
    let minutes = rng.random_range(CLOCK_MINUTES);
    (now + TimeDelta::minutes(minutes)).format("%H:%M").to_string()
}

/// Eight digits followed by two uppercase letters.
pub fn identifier<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut s = String::with_capacity(10);
    for _ in 0..8 {
        s.push(char::from(b'0' + rng.random_range(0..10u8)));
    }
    s.push_str(&letters(rng, 2));
    s
}

/// Lot code `AAA:MM/DD/YYYY`, 30 to 365 days after `now`.
pub fn expiry_code<R: Rng + ?Sized>(now: NaiveDateTime, rng: &mut R) -> String {
    let days = rng.random_range(EXPIRY_DAYS);
    let prefix = letters(rng, 3);
    format!(
        "{prefix}:{}",
        (now + TimeDelta::days(days)).format("%m/%d/%Y")
    )
}

fn letters<R: Rng + ?Sized>(rng: &mut R, n: usize) -> String {
    (0..n)
        .map(|_| char::from(b'A' + rng.random_range(0..26u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    #[test]
    fn expiry_date_is_within_window() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        for _ in 0..50 {
            let s = expiry_date(now(), &mut rng);
            let d = NaiveDate::parse_from_str(&s, "%d/%m/%Y").unwrap();
            let days = (d - now().date()).num_days();
            assert!((30..=365).contains(&days), "{s}");
        }
    }

    #[test]
    fn clock_time_is_hh_mm() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(6);
        for _ in 0..50 {
            let s = clock_time(now(), &mut rng);
            assert_eq!(s.len(), 5);
            assert_eq!(&s[2..3], ":");
            assert!(chrono::NaiveTime::parse_from_str(&s, "%H:%M").is_ok());
        }
    }

    #[test]
    fn identifier_is_eight_digits_two_letters() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let s = identifier(&mut rng);
        assert_eq!(s.len(), 10);
        assert!(s[..8].chars().all(|c| c.is_ascii_digit()));
        assert!(s[8..].chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn expiry_code_has_prefix_and_us_date() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(8);
        let s = expiry_code(now(), &mut rng);
        let (prefix, date) = s.split_once(':').unwrap();
        assert_eq!(prefix.len(), 3);
        assert!(prefix.chars().all(|c| c.is_ascii_uppercase()));
        assert!(NaiveDate::parse_from_str(date, "%m/%d/%Y").is_ok());
    }

    #[test]
    fn generated_text_uses_registered_symbols_only() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(10);
        let all = [
            expiry_date(now(), &mut rng),
            clock_time(now(), &mut rng),
            identifier(&mut rng),
            expiry_code(now(), &mut rng),
        ];
        for s in all {
            assert!(
                s.chars()
                    .all(|c| crate::CHARSET.iter().any(|(k, _)| *k == c)),
                "{s}"
            );
        }
    }
}
