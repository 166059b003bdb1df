/// Canonical form used to match CSV headers against schema column names.
///
/// `PatientId`, `patient_id` and ` Patient ID ` all collapse to `patientid`.
pub(crate) fn normalize_header(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}'], "")
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '_' && *ch != '-')
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize_header;

    #[test]
    fn collapses_case_whitespace_and_separators() {
        assert_eq!(normalize_header("PatientId"), "patientid");
        assert_eq!(normalize_header(" patient_id "), "patientid");
        assert_eq!(normalize_header("Patient ID"), "patientid");
        assert_eq!(normalize_header("survival-probability"), "survivalprobability");
    }

    #[test]
    fn strips_byte_order_mark_and_zero_width_space() {
        assert_eq!(normalize_header("\u{feff}Urgency\u{200b}Score"), "urgencyscore");
    }
}
