use crate::error::AppError;
use crate::models::{NewRide, NewUser};

/// Validate a registration payload beyond its JSON shape
pub fn validate_registration(user: &NewUser) -> Result<(), AppError> {
    if user.name.trim().is_empty() {
        return Err(AppError::InvalidInput("Name must not be empty".to_string()));
    }
    if !is_plausible_email(&user.email) {
        return Err(AppError::InvalidInput(format!(
            "Invalid email address: {}",
            user.email
        )));
    }
    Ok(())
}

/// Validate a ride creation payload beyond its JSON shape
pub fn validate_new_ride(ride: &NewRide) -> Result<(), AppError> {
    if let Some(seats) = ride.seats_available {
        if seats < 1 {
            return Err(AppError::InvalidInput(
                "seatsAvailable must be at least 1".to_string(),
            ));
        }
    }
    Ok(())
}

/// Shape check only; deliverability is the client's problem
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RideStatus, Role};

    fn registration(name: &str, email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: name.to_string(),
            role: Role::Rider,
            avatar: None,
            phone: None,
            location: None,
        }
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_plausible_email("alex@example.com"));
        assert!(!is_plausible_email("alex"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("alex@nodot"));
        assert!(!is_plausible_email("alex@.com"));
    }

    #[test]
    fn test_registration_validation() {
        assert!(validate_registration(&registration("Alex", "alex@example.com")).is_ok());
        assert!(validate_registration(&registration("  ", "alex@example.com")).is_err());
        assert!(validate_registration(&registration("Alex", "not-an-email")).is_err());
    }

    #[test]
    fn test_ride_seat_validation() {
        let mut ride = NewRide {
            driver_id: 1,
            status: RideStatus::Pending,
            rider_id: None,
            pickup_location: None,
            destination: None,
            seats_available: None,
            distance: None,
            duration: None,
            scheduled_time: None,
        };
        assert!(validate_new_ride(&ride).is_ok());

        ride.seats_available = Some(3);
        assert!(validate_new_ride(&ride).is_ok());

        ride.seats_available = Some(0);
        assert!(validate_new_ride(&ride).is_err());
    }
}
