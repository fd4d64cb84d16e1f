use crate::models::DoctorType;

pub const DOCTOR_TYPES: [DoctorType; 15] = [
    DoctorType { id: "gp", title: "General Practitioner (GP)" },
    DoctorType { id: "cardiologist", title: "Cardiologist" },
    DoctorType { id: "pediatrician", title: "Pediatrician" },
    DoctorType { id: "orthopedic", title: "Orthopedic Surgeon" },
    DoctorType { id: "gynecologist", title: "Gynecologist" },
    DoctorType { id: "obstetrician", title: "Obstetrician (OB)" },
    DoctorType { id: "dermatologist", title: "Dermatologist" },
    DoctorType { id: "endocrinologist", title: "Endocrinologist" },
    DoctorType { id: "neurologist", title: "Neurologist" },
    DoctorType { id: "psychiatrist", title: "Psychiatrist" },
    DoctorType { id: "gastroenterologist", title: "Gastroenterologist" },
    DoctorType { id: "pulmonologist", title: "Pulmonologist" },
    DoctorType { id: "oncologist", title: "Oncologist" },
    DoctorType { id: "ophthalmologist", title: "Ophthalmologist" },
    DoctorType { id: "urologist", title: "Urologist" },
];

/// Looks a specialization up by id or title, ignoring case.
pub fn find_specialization(value: &str) -> Option<&'static DoctorType> {
    let value = value.trim();
    DOCTOR_TYPES
        .iter()
        .find(|t| t.id.eq_ignore_ascii_case(value) || t.title.eq_ignore_ascii_case(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id_or_title() {
        assert_eq!(find_specialization("GP").map(|t| t.title), Some("General Practitioner (GP)"));
        assert_eq!(find_specialization("orthopedic surgeon").map(|t| t.id), Some("orthopedic"));
        assert!(find_specialization("astrologer").is_none());
    }
}
