mod avg_duration_by_country;

pub use avg_duration_by_country::{get_transaction_avg_duration_by_country, AvgDurationByCountry};
