//! Static travel plan catalogue inserted when the plans table is empty.

use super::{NewInsurancePlan, PlanAttributes, PlanValidationError};

struct SamplePlan {
    name: &'static str,
    provider: &'static str,
    base_price: i32,
    medical_coverage: i32,
    trip_cancellation: &'static str,
    baggage_protection: i32,
    emergency_evacuation: Option<i32>,
    adventure_activities: bool,
    rental_car_coverage: Option<i32>,
    rating: Option<&'static str>,
    reviews: i32,
    country: &'static str,
}

const SAMPLE_PLANS: &[SamplePlan] = &[
    SamplePlan {
        name: "Basic Travel Protection",
        provider: "Global Guard",
        base_price: 45,
        medical_coverage: 50_000,
        trip_cancellation: "Up to 100% of trip cost",
        baggage_protection: 500,
        emergency_evacuation: Some(100_000),
        adventure_activities: false,
        rental_car_coverage: None,
        rating: Some("4.2"),
        reviews: 128,
        country: "all",
    },
    SamplePlan {
        name: "Premium Explorer",
        provider: "WorldTrek Insurance",
        base_price: 120,
        medical_coverage: 250_000,
        trip_cancellation: "Up to 150% of trip cost",
        baggage_protection: 2_500,
        emergency_evacuation: Some(500_000),
        adventure_activities: true,
        rental_car_coverage: Some(35_000),
        rating: Some("4.8"),
        reviews: 342,
        country: "all",
    },
    SamplePlan {
        name: "Adventure Seeker",
        provider: "Summit Assurance",
        base_price: 95,
        medical_coverage: 150_000,
        trip_cancellation: "Up to 100% of trip cost",
        baggage_protection: 1_500,
        emergency_evacuation: Some(300_000),
        adventure_activities: true,
        rental_car_coverage: None,
        rating: Some("4.6"),
        reviews: 211,
        country: "all",
    },
    SamplePlan {
        name: "Mexico Getaway",
        provider: "Pacific Cover",
        base_price: 38,
        medical_coverage: 75_000,
        trip_cancellation: "Up to 75% of trip cost",
        baggage_protection: 750,
        emergency_evacuation: Some(150_000),
        adventure_activities: false,
        rental_car_coverage: Some(25_000),
        rating: Some("4.1"),
        reviews: 87,
        country: "Mexico",
    },
    SamplePlan {
        name: "Europe Schengen Essential",
        provider: "EuroSafe",
        base_price: 52,
        medical_coverage: 100_000,
        trip_cancellation: "Up to 100% of trip cost",
        baggage_protection: 1_000,
        emergency_evacuation: Some(200_000),
        adventure_activities: false,
        rental_car_coverage: None,
        rating: Some("4.4"),
        reviews: 163,
        country: "Spain",
    },
    SamplePlan {
        name: "Andes Trekker",
        provider: "Summit Assurance",
        base_price: 78,
        medical_coverage: 120_000,
        trip_cancellation: "Up to 100% of trip cost",
        baggage_protection: 1_200,
        emergency_evacuation: Some(400_000),
        adventure_activities: true,
        rental_car_coverage: None,
        rating: Some("4.5"),
        reviews: 59,
        country: "Colombia",
    },
    SamplePlan {
        name: "Weekend Saver",
        provider: "Global Guard",
        base_price: 25,
        medical_coverage: 25_000,
        trip_cancellation: "Up to 50% of trip cost",
        baggage_protection: 300,
        emergency_evacuation: None,
        adventure_activities: false,
        rental_car_coverage: None,
        rating: Some("3.9"),
        reviews: 44,
        country: "all",
    },
    SamplePlan {
        name: "Family Vacation Plus",
        provider: "Pacific Cover",
        base_price: 140,
        medical_coverage: 200_000,
        trip_cancellation: "Up to 125% of trip cost",
        baggage_protection: 3_000,
        emergency_evacuation: Some(250_000),
        adventure_activities: false,
        rental_car_coverage: Some(50_000),
        rating: None,
        reviews: 0,
        country: "USA",
    },
];

/// Build the sample catalogue as validated domain values.
///
/// # Errors
/// Returns [`PlanValidationError`] if a sample entry violates a plan
/// invariant.
pub fn sample_plans() -> Result<Vec<NewInsurancePlan>, PlanValidationError> {
    SAMPLE_PLANS
        .iter()
        .map(|plan| {
            NewInsurancePlan::new(PlanAttributes {
                name: plan.name.to_owned(),
                provider: plan.provider.to_owned(),
                base_price: plan.base_price,
                medical_coverage: plan.medical_coverage,
                trip_cancellation: plan.trip_cancellation.to_owned(),
                baggage_protection: plan.baggage_protection,
                emergency_evacuation: plan.emergency_evacuation,
                adventure_activities: plan.adventure_activities,
                rental_car_coverage: plan.rental_car_coverage,
                rating: plan.rating.map(str::to_owned),
                reviews: Some(plan.reviews),
                country: plan.country.to_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn sample_plans_are_valid() {
        let plans = sample_plans().expect("sample plans validate");
        assert_eq!(plans.len(), SAMPLE_PLANS.len());
    }

    #[test]
    fn sample_plan_names_are_unique() {
        let names: HashSet<_> = SAMPLE_PLANS.iter().map(|plan| plan.name).collect();
        assert_eq!(names.len(), SAMPLE_PLANS.len());
    }

    #[test]
    fn sample_catalogue_covers_filter_predicates() {
        let plans = sample_plans().expect("sample plans validate");
        assert!(plans.iter().any(|p| p.attributes().adventure_activities));
        assert!(plans.iter().any(|p| p.attributes().covers_any_country()));
        assert!(plans.iter().any(|p| !p.attributes().covers_any_country()));
    }
}
