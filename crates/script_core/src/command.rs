//! One-shot operations and parameterized reads.
//!
//! Method-style calls on a proxy (apply an impulse, play a sound, set a UI
//! label) become a [`Command`]; reads that take arguments or have no setter
//! become a [`Query`].

use script_math::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::component::ComponentTypeId;
use crate::value::ValueKind;

/// A fire-and-forget request against one entity's component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    // Rigidbody
    AddForce(Vec3),
    AddTorque(Vec3),
    AddForceAndTorque { force: Vec3, torque: Vec3 },
    AddImpulse(Vec3),
    AddAngularImpulse(Vec3),
    AddLinearVelocity(Vec3),
    MoveKinematic {
        position: Vec3,
        euler_angles: Vec3,
        delta_time: f32,
    },
    SetPosition { position: Vec3, activate: bool },
    SetEulerAngles { euler_angles: Vec3, activate: bool },
    SetRotation { rotation: Quat, activate: bool },
    ActivateBody,
    DeactivateBody,
    DestroyBody,

    // Rigidbody2D
    ApplyLinearImpulse { impulse: Vec2, point: Vec2, wake: bool },
    ApplyLinearImpulseToCenter { impulse: Vec2, wake: bool },
    ApplyForce { force: Vec2, point: Vec2, wake: bool },
    ApplyForceToCenter { force: Vec2, wake: bool },

    // Audio
    Play,
    PlayOverlapping,
    PlayLooped,
    Stop,

    // UI
    SetUiText { name: String, text: String },
}

impl Command {
    /// The component this command targets.
    #[must_use]
    pub fn component(&self) -> ComponentTypeId {
        use Command::*;
        match self {
            AddForce(_)
            | AddTorque(_)
            | AddForceAndTorque { .. }
            | AddImpulse(_)
            | AddAngularImpulse(_)
            | AddLinearVelocity(_)
            | MoveKinematic { .. }
            | SetPosition { .. }
            | SetEulerAngles { .. }
            | SetRotation { .. }
            | ActivateBody
            | DeactivateBody
            | DestroyBody => ComponentTypeId::RIGIDBODY,
            ApplyLinearImpulse { .. }
            | ApplyLinearImpulseToCenter { .. }
            | ApplyForce { .. }
            | ApplyForceToCenter { .. } => ComponentTypeId::RIGIDBODY_2D,
            Play | PlayOverlapping | PlayLooped | Stop => ComponentTypeId::AUDIO,
            SetUiText { .. } => ComponentTypeId::UI,
        }
    }
}

/// A read that takes arguments or has no matching setter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Query {
    /// Rigidbody orientation as a quaternion.
    BodyRotation,
    /// Rigidbody orientation as `(pitch, yaw, roll)`.
    BodyEulerAngles,
    BodyCenterOfMass,
    BodyIsActive,
    /// Whether the 2D body currently touches an entity carrying `tag`.
    IsContactWithTag(String),
    /// Tag of the entity the 2D body touches, empty when none.
    ContactTag,
    /// Text of the named label inside a UI component.
    UiText(String),
}

impl Query {
    #[must_use]
    pub fn component(&self) -> ComponentTypeId {
        match self {
            Query::BodyRotation
            | Query::BodyEulerAngles
            | Query::BodyCenterOfMass
            | Query::BodyIsActive => ComponentTypeId::RIGIDBODY,
            Query::IsContactWithTag(_) | Query::ContactTag => ComponentTypeId::RIGIDBODY_2D,
            Query::UiText(_) => ComponentTypeId::UI,
        }
    }

    /// The kind of value the engine answers with.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Query::BodyRotation => ValueKind::Quat,
            Query::BodyEulerAngles | Query::BodyCenterOfMass => ValueKind::Vec3,
            Query::BodyIsActive | Query::IsContactWithTag(_) => ValueKind::Bool,
            Query::ContactTag | Query::UiText(_) => ValueKind::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_targets() {
        assert_eq!(
            Command::AddImpulse(Vec3::Y).component(),
            ComponentTypeId::RIGIDBODY
        );
        assert_eq!(
            Command::ApplyForceToCenter {
                force: Vec2::X,
                wake: true
            }
            .component(),
            ComponentTypeId::RIGIDBODY_2D
        );
        assert_eq!(Command::Play.component(), ComponentTypeId::AUDIO);
    }

    #[test]
    fn test_query_kinds() {
        assert_eq!(Query::BodyRotation.kind(), ValueKind::Quat);
        assert_eq!(
            Query::IsContactWithTag("Floor".into()).component(),
            ComponentTypeId::RIGIDBODY_2D
        );
        assert_eq!(Query::UiText("FPS".into()).kind(), ValueKind::Text);
    }
}
