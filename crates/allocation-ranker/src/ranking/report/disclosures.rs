/// Ethical safeguards printed once at the end of every report.
pub const ETHICAL_SAFEGUARDS: &[&str] = &[
    "Ensure data is anonymized and consented in real-world applications.",
    "Regular audits for bias and fairness.",
    "Include a manual override for healthcare professionals.",
];
