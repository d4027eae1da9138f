use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{DataError, MicrogridResult},
    gym::microgrid::space::Clip,
};

/// Raw action vector in field order `[charge_battery, charge_hydrogen]`.
pub type ActionVector = [f64; Action::DIM];

/// Control vector applied to the storages for one timestep.
///
/// Both fields are signed power in kW: positive values charge the storage,
/// negative values discharge it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Action {
    pub charge_battery: f64,
    pub charge_hydrogen: f64,
}

impl Action {
    pub const DIM: usize = 2;

    pub fn new(charge_battery: f64, charge_hydrogen: f64) -> Self {
        Self {
            charge_battery,
            charge_hydrogen,
        }
    }

    pub fn to_vector(&self) -> ActionVector {
        [self.charge_battery, self.charge_hydrogen]
    }

    /// Rebuilds an action from a vector in the documented field order.
    ///
    /// Fails with [`DataError::Shape`] if `v` does not hold exactly
    /// [`Action::DIM`] elements.
    pub fn from_vector(v: &[f64]) -> MicrogridResult<Self> {
        let arr: ActionVector = v.try_into().map_err(|_| DataError::Shape {
            kind: "action",
            expected: Self::DIM,
            actual: v.len(),
        })?;
        Ok(arr.into())
    }
}

impl From<ActionVector> for Action {
    fn from([charge_battery, charge_hydrogen]: ActionVector) -> Self {
        Self {
            charge_battery,
            charge_hydrogen,
        }
    }
}

impl From<Action> for ActionVector {
    fn from(action: Action) -> Self {
        action.to_vector()
    }
}

impl Clip for Action {
    fn clip(&self, low: &Self, high: &Self) -> Self {
        Self {
            charge_battery: self.charge_battery.max(low.charge_battery).min(high.charge_battery),
            charge_hydrogen: self
                .charge_hydrogen
                .max(low.charge_hydrogen)
                .min(high.charge_hydrogen),
        }
    }

    fn within(&self, low: &Self, high: &Self) -> bool {
        (low.charge_battery..=high.charge_battery).contains(&self.charge_battery)
            && (low.charge_hydrogen..=high.charge_hydrogen).contains(&self.charge_hydrogen)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "battery {:+.2} kW, hydrogen {:+.2} kW",
            self.charge_battery, self.charge_hydrogen
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MicrogridError;

    #[test]
    fn fields_keep_their_values() {
        let action = Action::new(400.0, 55.0);
        assert_eq!(action.charge_battery, 400.0);
        assert_eq!(action.charge_hydrogen, 55.0);
    }

    #[test]
    fn vector_round_trip() {
        let action = Action::new(-123.25, 17.5);
        let back = Action::from_vector(&action.to_vector()).unwrap();
        assert_eq!(back, action);
        assert_eq!(back.to_vector(), [-123.25, 17.5]);
    }

    #[test]
    fn wrong_length_is_a_shape_error() {
        for v in [&[][..], &[1.0][..], &[1.0, 2.0, 3.0][..]] {
            let err = Action::from_vector(v).unwrap_err();
            assert!(matches!(
                err,
                MicrogridError::Data(DataError::Shape {
                    kind: "action",
                    expected: 2,
                    ..
                })
            ));
        }
    }

    #[test]
    fn clip_saturates_each_field_independently() {
        let low = Action::new(-400.0, -100.0);
        let high = Action::new(400.0, 55.0);

        let clipped = Action::new(1e6, -1e6).clip(&low, &high);
        assert_eq!(clipped, Action::new(400.0, -100.0));

        let inside = Action::new(10.0, 5.0);
        assert_eq!(inside.clip(&low, &high), inside);
        assert!(inside.within(&low, &high));
        assert!(!Action::new(10.0, 56.0).within(&low, &high));
    }
}
