use chrono::{Months, NaiveDate};

use crate::error::SearchError;
use crate::models::{AoiMode, Geometry, SearchRequest, SENSOR_NAME};

/// Date format of `<input type="date">` values.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw values of the search form inputs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchForm {
    pub username: String,
    pub password: String,
    pub start_date: String,
    pub end_date: String,
    pub aoi_mode: AoiMode,
}

impl SearchForm {
    /// Empty credentials, date range ending `today`.
    pub fn with_default_dates(today: NaiveDate) -> Self {
        let (start, end) = default_date_range(today);
        SearchForm {
            start_date: format_input_date(start),
            end_date: format_input_date(end),
            ..Default::default()
        }
    }

    /// Build the request body, or the error to show instead of searching.
    ///
    /// The username is trimmed; the password is sent exactly as typed.
    pub fn validate(&self, aoi: Option<&Geometry>) -> Result<SearchRequest, SearchError> {
        let username = self.username.trim();
        if username.is_empty()
            || self.password.is_empty()
            || self.start_date.is_empty()
            || self.end_date.is_empty()
        {
            return Err(SearchError::MissingFields);
        }

        // Values the browser could not parse are left for the server to reject.
        if let (Some(start), Some(end)) = (
            parse_input_date(&self.start_date),
            parse_input_date(&self.end_date),
        ) {
            if start > end {
                return Err(SearchError::DateOrder);
            }
        }

        let aoi_geojson = match self.aoi_mode {
            AoiMode::Country => None,
            AoiMode::Custom => Some(aoi.cloned().ok_or(SearchError::MissingAoi)?),
        };

        Ok(SearchRequest {
            username: username.to_string(),
            password: self.password.clone(),
            startdate: self.start_date.clone(),
            enddate: self.end_date.clone(),
            sensorname: SENSOR_NAME.to_string(),
            aoi_mode: self.aoi_mode,
            aoi_geojson,
        })
    }
}

/// `(one month before today, today)`. Month-end days clamp to the shorter month.
pub fn default_date_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today.checked_sub_months(Months::new(1)).unwrap_or(today);
    (start, today)
}

pub fn format_input_date(date: NaiveDate) -> String {
    date.format(INPUT_DATE_FORMAT).to_string()
}

pub fn parse_input_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), INPUT_DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(mode: AoiMode) -> SearchForm {
        SearchForm {
            username: "  analyst ".into(),
            password: " secret ".into(),
            start_date: "2024-03-01".into(),
            end_date: "2024-03-31".into(),
            aoi_mode: mode,
        }
    }

    fn triangle() -> Geometry {
        Geometry::Polygon(vec![vec![
            vec![4.0, 52.0],
            vec![5.0, 52.0],
            vec![4.5, 53.0],
            vec![4.0, 52.0],
        ]])
    }

    #[test]
    fn test_valid_country_request() {
        let req = filled(AoiMode::Country).validate(Some(&triangle())).unwrap();
        assert_eq!(req.username, "analyst");
        assert_eq!(req.password, " secret ");
        assert_eq!(req.sensorname, SENSOR_NAME);
        assert_eq!(req.aoi_mode, AoiMode::Country);
        assert!(req.aoi_geojson.is_none());
    }

    #[test]
    fn test_valid_custom_request_carries_geometry() {
        let req = filled(AoiMode::Custom).validate(Some(&triangle())).unwrap();
        assert_eq!(req.aoi_geojson, Some(triangle()));
    }

    #[test]
    fn test_each_missing_field_is_rejected() {
        let blanks: [fn(&mut SearchForm); 4] = [
            |f| f.username = "   ".into(),
            |f| f.password.clear(),
            |f| f.start_date.clear(),
            |f| f.end_date.clear(),
        ];
        for blank in blanks {
            let mut form = filled(AoiMode::Country);
            blank(&mut form);
            assert_eq!(form.validate(None), Err(SearchError::MissingFields));
        }
    }

    #[test]
    fn test_start_after_end_rejected() {
        let mut form = filled(AoiMode::Country);
        form.start_date = "2024-04-02".into();
        assert_eq!(form.validate(None), Err(SearchError::DateOrder));
    }

    #[test]
    fn test_same_day_range_allowed() {
        let mut form = filled(AoiMode::Country);
        form.start_date = form.end_date.clone();
        assert!(form.validate(None).is_ok());
    }

    #[test]
    fn test_custom_without_shape_rejected() {
        assert_eq!(
            filled(AoiMode::Custom).validate(None),
            Err(SearchError::MissingAoi)
        );
    }

    #[test]
    fn test_missing_fields_checked_before_aoi() {
        let mut form = filled(AoiMode::Custom);
        form.password.clear();
        assert_eq!(form.validate(None), Err(SearchError::MissingFields));
    }

    #[test]
    fn test_default_date_range() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let form = SearchForm::with_default_dates(today);
        assert_eq!(form.start_date, "2024-04-15");
        assert_eq!(form.end_date, "2024-05-15");
        assert!(form.username.is_empty());
    }

    #[test]
    fn test_default_date_range_clamps_month_end() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let (start, _) = default_date_range(today);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_default_date_range_crosses_year() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let (start, _) = default_date_range(today);
        assert_eq!(format_input_date(start), "2024-12-10");
    }
}
