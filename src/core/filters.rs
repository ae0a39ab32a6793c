use crate::core::error::Ineligibility;
use crate::core::timeslot::{parse_availability, TimeSlot};
use crate::models::{FilterRule, MatchFilters, Person, Side};

/// Check the hard exclusion rules for a pair
///
/// `person_a` is always the pool A member and `person_b` the pool B member.
/// The availability slices are the already-parsed availability of each.
pub fn check_eligibility_parsed(
    person_a: &Person,
    slots_a: &[TimeSlot],
    person_b: &Person,
    slots_b: &[TimeSlot],
    filters: &MatchFilters,
) -> Result<(), Ineligibility> {
    // Nothing to schedule
    if slots_a.is_empty() {
        return Err(Ineligibility::EmptyAvailability(Side::A));
    }
    if slots_b.is_empty() {
        return Err(Ineligibility::EmptyAvailability(Side::B));
    }

    let (requiring, offering) = match filters.requiring_side {
        Side::A => (person_a, person_b),
        Side::B => (person_b, person_a),
    };

    if filters.language && !language_compatible(requiring, offering, filters.language_rule) {
        return Err(Ineligibility::LanguageMismatch {
            required: requiring.language.clone(),
            offered: offering.language.clone(),
        });
    }

    if filters.live_scan && !certification_compatible(requiring, offering, filters.live_scan_rule) {
        return Err(Ineligibility::CertificationMissing);
    }

    Ok(())
}

/// Check the hard exclusion rules, parsing availability on the fly
pub fn check_eligibility(
    person_a: &Person,
    person_b: &Person,
    filters: &MatchFilters,
) -> Result<(), Ineligibility> {
    let slots_a = parse_availability(&person_a.availability);
    let slots_b = parse_availability(&person_b.availability);
    check_eligibility_parsed(person_a, &slots_a, person_b, &slots_b, filters)
}

#[inline]
pub fn is_eligible(person_a: &Person, person_b: &Person, filters: &MatchFilters) -> bool {
    check_eligibility(person_a, person_b, filters).is_ok()
}

/// Strict: primary languages must be equal.
/// Directional: the offering side must speak the requiring side's language.
#[inline]
fn language_compatible(requiring: &Person, offering: &Person, rule: FilterRule) -> bool {
    match rule {
        FilterRule::Strict => requiring.language == offering.language,
        FilterRule::Directional => offering.speaks(&requiring.language),
    }
}

/// Strict: both flags must be equal.
/// Directional: only a requiring side with the flag set needs a certified counterpart.
#[inline]
fn certification_compatible(requiring: &Person, offering: &Person, rule: FilterRule) -> bool {
    match rule {
        FilterRule::Strict => requiring.live_scan == offering.live_scan,
        FilterRule::Directional => !requiring.live_scan || offering.live_scan,
    }
}
