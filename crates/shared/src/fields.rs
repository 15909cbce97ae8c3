//! Form state store: one raw text slot per property attribute.
//!
//! Slots hold exactly what the user typed; nothing is parsed or validated
//! here. Coercion into the wire payload happens in [`crate::protocol`] at
//! submission time, against a by-value snapshot of this store.

/// Names every attribute slot of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Street,
    City,
    Statezip,
    SqftLiving,
    Bedrooms,
    Bathrooms,
    Grade,
    Lat,
    Long,
    YrBuilt,
    Waterfront,
    View,
    Condition,
    Floors,
    Zipcode,
    YrRenovated,
    SqftLot,
    SqftAbove,
    SqftBasement,
}

impl Field {
    pub const ALL: [Field; 20] = [
        Field::Date,
        Field::Street,
        Field::City,
        Field::Statezip,
        Field::SqftLiving,
        Field::Bedrooms,
        Field::Bathrooms,
        Field::Grade,
        Field::Lat,
        Field::Long,
        Field::YrBuilt,
        Field::Waterfront,
        Field::View,
        Field::Condition,
        Field::Floors,
        Field::Zipcode,
        Field::YrRenovated,
        Field::SqftLot,
        Field::SqftAbove,
        Field::SqftBasement,
    ];

    /// Wire key for this field in the prediction payload.
    pub fn key(self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Street => "street",
            Field::City => "city",
            Field::Statezip => "statezip",
            Field::SqftLiving => "sqft_living",
            Field::Bedrooms => "bedrooms",
            Field::Bathrooms => "bathrooms",
            Field::Grade => "grade",
            Field::Lat => "lat",
            Field::Long => "long",
            Field::YrBuilt => "yr_built",
            Field::Waterfront => "waterfront",
            Field::View => "view",
            Field::Condition => "condition",
            Field::Floors => "floors",
            Field::Zipcode => "zipcode",
            Field::YrRenovated => "yr_renovated",
            Field::SqftLot => "sqft_lot",
            Field::SqftAbove => "sqft_above",
            Field::SqftBasement => "sqft_basement",
        }
    }
}

/// The complete set of user-entered property attributes, as raw text.
///
/// Created once at startup and kept alive across submissions. The UI edits
/// the slots through [`FieldSet::slot_mut`], so the displayed value and the
/// stored value can never diverge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    pub date: String,
    pub street: String,
    pub city: String,
    pub statezip: String,
    pub sqft_living: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub grade: String,
    pub lat: String,
    pub long: String,
    pub yr_built: String,
    pub waterfront: String,
    pub view: String,
    pub condition: String,
    pub floors: String,
    pub zipcode: String,
    pub yr_renovated: String,
    pub sqft_lot: String,
    pub sqft_above: String,
    pub sqft_basement: String,
}

impl Default for FieldSet {
    fn default() -> Self {
        Self {
            date: "2025-01-15".to_string(),
            street: "123 Main St".to_string(),
            city: "Seattle".to_string(),
            statezip: "WA 98101".to_string(),
            sqft_living: String::new(),
            bedrooms: String::new(),
            bathrooms: String::new(),
            grade: String::new(),
            lat: String::new(),
            long: String::new(),
            yr_built: String::new(),
            waterfront: "0".to_string(),
            view: "0".to_string(),
            condition: "1".to_string(),
            floors: String::new(),
            zipcode: String::new(),
            yr_renovated: String::new(),
            sqft_lot: String::new(),
            sqft_above: String::new(),
            sqft_basement: String::new(),
        }
    }
}

impl FieldSet {
    /// Stores a new raw value for one slot. No validation, no side effects;
    /// safe to call in any submission state.
    pub fn set(&mut self, field: Field, raw: impl Into<String>) {
        *self.slot_mut(field) = raw.into();
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Date => &self.date,
            Field::Street => &self.street,
            Field::City => &self.city,
            Field::Statezip => &self.statezip,
            Field::SqftLiving => &self.sqft_living,
            Field::Bedrooms => &self.bedrooms,
            Field::Bathrooms => &self.bathrooms,
            Field::Grade => &self.grade,
            Field::Lat => &self.lat,
            Field::Long => &self.long,
            Field::YrBuilt => &self.yr_built,
            Field::Waterfront => &self.waterfront,
            Field::View => &self.view,
            Field::Condition => &self.condition,
            Field::Floors => &self.floors,
            Field::Zipcode => &self.zipcode,
            Field::YrRenovated => &self.yr_renovated,
            Field::SqftLot => &self.sqft_lot,
            Field::SqftAbove => &self.sqft_above,
            Field::SqftBasement => &self.sqft_basement,
        }
    }

    /// Mutable access for direct widget binding.
    pub fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Date => &mut self.date,
            Field::Street => &mut self.street,
            Field::City => &mut self.city,
            Field::Statezip => &mut self.statezip,
            Field::SqftLiving => &mut self.sqft_living,
            Field::Bedrooms => &mut self.bedrooms,
            Field::Bathrooms => &mut self.bathrooms,
            Field::Grade => &mut self.grade,
            Field::Lat => &mut self.lat,
            Field::Long => &mut self.long,
            Field::YrBuilt => &mut self.yr_built,
            Field::Waterfront => &mut self.waterfront,
            Field::View => &mut self.view,
            Field::Condition => &mut self.condition,
            Field::Floors => &mut self.floors,
            Field::Zipcode => &mut self.zipcode,
            Field::YrRenovated => &mut self.yr_renovated,
            Field::SqftLot => &mut self.sqft_lot,
            Field::SqftAbove => &mut self.sqft_above,
            Field::SqftBasement => &mut self.sqft_basement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_example_location_and_empty_numerics() {
        let fields = FieldSet::default();
        assert_eq!(fields.date, "2025-01-15");
        assert_eq!(fields.street, "123 Main St");
        assert_eq!(fields.city, "Seattle");
        assert_eq!(fields.statezip, "WA 98101");
        assert_eq!(fields.waterfront, "0");
        assert_eq!(fields.view, "0");
        assert_eq!(fields.condition, "1");
        assert!(fields.sqft_living.is_empty());
        assert!(fields.yr_renovated.is_empty());
    }

    #[test]
    fn set_updates_exactly_one_slot() {
        for field in Field::ALL {
            let baseline = FieldSet::default();
            let mut fields = baseline.clone();
            fields.set(field, "42");
            assert_eq!(fields.get(field), "42");
            for other in Field::ALL.into_iter().filter(|f| *f != field) {
                assert_eq!(fields.get(other), baseline.get(other));
            }
        }
    }

    #[test]
    fn slot_mut_and_get_agree() {
        let mut fields = FieldSet::default();
        fields.slot_mut(Field::Bathrooms).push_str("2.5");
        assert_eq!(fields.get(Field::Bathrooms), "2.5");
        assert_eq!(fields.bathrooms, "2.5");
    }

    #[test]
    fn wire_keys_are_unique() {
        let mut keys: Vec<&str> = Field::ALL.iter().map(|f| f.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), Field::ALL.len());
    }
}
