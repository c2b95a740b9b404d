//! Component proxies.
//!
//! Each proxy is an [`Entity`] with a type. Properties are
//! [`RemoteProperty`] handles generated from the [`Property`] catalog;
//! method-style operations send a single [`Command`].

use script_math::{Quat, Vec2, Vec3, Vec4};

use crate::command::{Command, Query};
use crate::component::Component;
use crate::handle::Entity;
use crate::property::{Property, RemoteProperty};

macro_rules! component_proxy {
    ($(#[$meta:meta])* $name:ident => $type_name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name<'a> {
            entity: Entity<'a>,
        }

        impl<'a> Component<'a> for $name<'a> {
            fn type_name() -> &'static str {
                $type_name
            }

            fn bind(entity: Entity<'a>) -> Self {
                Self { entity }
            }

            fn entity(&self) -> Entity<'a> {
                self.entity
            }
        }
    };
}

macro_rules! remote_properties {
    ($proxy:ident { $($(#[$meta:meta])* $getter:ident: $ty:ty => $property:ident),* $(,)? }) => {
        impl<'a> $proxy<'a> {
            $(
                $(#[$meta])*
                #[must_use]
                pub fn $getter(&self) -> RemoteProperty<'a, $ty> {
                    self.entity.property(Property::$property)
                }
            )*
        }
    };
}

component_proxy!(
    /// Position, orientation and scale.
    Transform => "Transform"
);

remote_properties!(Transform {
    translation: Vec3 => Translation,
    rotation: Quat => Rotation,
    /// Rotation as `(pitch, yaw, roll)` radians.
    euler_angles: Vec3 => EulerAngles,
    scale: Vec3 => Scale,
});

impl Transform<'_> {
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.entity.read(Property::Forward)
    }

    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.entity.read(Property::Right)
    }

    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.entity.read(Property::Up)
    }
}

component_proxy!(
    /// 3D physics body.
    Rigidbody => "Rigidbody"
);

remote_properties!(Rigidbody {
    linear_velocity: Vec3 => LinearVelocity,
    friction: f32 => BodyFriction,
    restitution: f32 => BodyRestitution,
    gravity_factor: f32 => GravityFactor,
});

impl Rigidbody<'_> {
    pub fn add_force(&self, force: Vec3) {
        self.entity.invoke(Command::AddForce(force));
    }

    pub fn add_torque(&self, torque: Vec3) {
        self.entity.invoke(Command::AddTorque(torque));
    }

    pub fn add_force_and_torque(&self, force: Vec3, torque: Vec3) {
        self.entity
            .invoke(Command::AddForceAndTorque { force, torque });
    }

    pub fn add_impulse(&self, impulse: Vec3) {
        self.entity.invoke(Command::AddImpulse(impulse));
    }

    pub fn add_angular_impulse(&self, impulse: Vec3) {
        self.entity.invoke(Command::AddAngularImpulse(impulse));
    }

    pub fn add_linear_velocity(&self, velocity: Vec3) {
        self.entity.invoke(Command::AddLinearVelocity(velocity));
    }

    /// Drive a kinematic body to `position` / `euler_angles` over `delta_time`.
    pub fn move_kinematic(&self, position: Vec3, euler_angles: Vec3, delta_time: f32) {
        self.entity.invoke(Command::MoveKinematic {
            position,
            euler_angles,
            delta_time,
        });
    }

    pub fn set_position(&self, position: Vec3, activate: bool) {
        self.entity
            .invoke(Command::SetPosition { position, activate });
    }

    pub fn set_euler_angles(&self, euler_angles: Vec3, activate: bool) {
        self.entity.invoke(Command::SetEulerAngles {
            euler_angles,
            activate,
        });
    }

    #[must_use]
    pub fn euler_angles(&self) -> Vec3 {
        self.entity.query(Query::BodyEulerAngles)
    }

    pub fn set_rotation(&self, rotation: Quat, activate: bool) {
        self.entity
            .invoke(Command::SetRotation { rotation, activate });
    }

    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.entity.query(Query::BodyRotation)
    }

    #[must_use]
    pub fn center_of_mass_position(&self) -> Vec3 {
        self.entity.query(Query::BodyCenterOfMass)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.entity.query(Query::BodyIsActive)
    }

    pub fn activate_body(&self) {
        self.entity.invoke(Command::ActivateBody);
    }

    pub fn deactivate_body(&self) {
        self.entity.invoke(Command::DeactivateBody);
    }

    pub fn destroy_body(&self) {
        self.entity.invoke(Command::DestroyBody);
    }
}

component_proxy!(
    /// 2D physics body.
    Rigidbody2D => "Rigidbody2D"
);

remote_properties!(Rigidbody2D {
    velocity: Vec2 => Velocity2D,
});

impl Rigidbody2D<'_> {
    /// Impulse applied at world-space `point`.
    pub fn apply_linear_impulse(&self, impulse: Vec2, point: Vec2, wake: bool) {
        self.entity.invoke(Command::ApplyLinearImpulse {
            impulse,
            point,
            wake,
        });
    }

    pub fn apply_linear_impulse_to_center(&self, impulse: Vec2, wake: bool) {
        self.entity
            .invoke(Command::ApplyLinearImpulseToCenter { impulse, wake });
    }

    /// Force applied at world-space `point`.
    pub fn apply_force(&self, force: Vec2, point: Vec2, wake: bool) {
        self.entity
            .invoke(Command::ApplyForce { force, point, wake });
    }

    pub fn apply_force_to_center(&self, force: Vec2, wake: bool) {
        self.entity
            .invoke(Command::ApplyForceToCenter { force, wake });
    }

    #[must_use]
    pub fn is_contact_with_tag(&self, tag: &str) -> bool {
        self.entity.query(Query::IsContactWithTag(tag.to_owned()))
    }

    /// Tag of whatever the body currently touches; empty when nothing.
    #[must_use]
    pub fn contact_with_tag(&self) -> String {
        self.entity.query(Query::ContactTag)
    }
}

component_proxy!(
    /// Audio source.
    Audio => "Audio"
);

remote_properties!(Audio {
    name: String => AudioName,
    volume: f32 => AudioVolume,
    pitch: f32 => AudioPitch,
    min_distance: f32 => AudioMinDistance,
    max_distance: f32 => AudioMaxDistance,
    looping: bool => AudioLooping,
    spatial: bool => AudioSpatial,
    play_at_start: bool => AudioPlayAtStart,
});

impl Audio<'_> {
    pub fn play(&self) {
        self.entity.invoke(Command::Play);
    }

    /// Start another voice without cutting the one already playing.
    pub fn play_overlapping(&self) {
        self.entity.invoke(Command::PlayOverlapping);
    }

    pub fn play_looped(&self) {
        self.entity.invoke(Command::PlayLooped);
    }

    pub fn stop(&self) {
        self.entity.invoke(Command::Stop);
    }
}

component_proxy!(
    /// World-space text.
    Text => "Text"
);

remote_properties!(Text {
    text: String => TextString,
    color: Vec3 => TextColor,
    kerning: f32 => TextKerning,
    line_spacing: f32 => TextLineSpacing,
});

component_proxy!(SpriteRenderer2D => "SpriteRenderer2D");

remote_properties!(SpriteRenderer2D {
    color: Vec4 => SpriteColor,
    flip_x: bool => SpriteFlipX,
    flip_y: bool => SpriteFlipY,
    tiling_factor: Vec2 => SpriteTilingFactor,
});

component_proxy!(SpriteAnimation => "SpriteAnimation");

remote_properties!(SpriteAnimation {
    /// Name of the playing animation state.
    active_state: String => AnimationActiveState,
});

impl SpriteAnimation<'_> {
    /// Switch state by name.
    pub fn play_state(&self, state: &str) {
        self.active_state().set(state.to_owned());
    }
}

component_proxy!(CircleRenderer => "CircleRenderer");

remote_properties!(CircleRenderer {
    color: Vec3 => CircleColor,
    thickness: f32 => CircleThickness,
    fade: f32 => CircleFade,
});

component_proxy!(BoxCollider2D => "BoxCollider2D");

remote_properties!(BoxCollider2D {
    offset: Vec2 => BoxOffset,
    size: Vec2 => BoxSize,
    density: f32 => BoxDensity,
    friction: f32 => BoxFriction,
    restitution: f32 => BoxRestitution,
    restitution_threshold: f32 => BoxRestitutionThreshold,
});

component_proxy!(CircleCollider2D => "CircleCollider2D");

remote_properties!(CircleCollider2D {
    offset: Vec2 => CircleOffset,
    radius: f32 => CircleRadius,
    density: f32 => CircleDensity,
    friction: f32 => CircleFriction,
    restitution: f32 => CircleRestitution,
    restitution_threshold: f32 => CircleRestitutionThreshold,
});

component_proxy!(
    /// Screen-space UI holding named text labels.
    UI => "UI"
);

impl UI<'_> {
    /// Text of the label called `name`; empty when there is none.
    #[must_use]
    pub fn text(&self, name: &str) -> String {
        self.entity.query(Query::UiText(name.to_owned()))
    }

    pub fn set_text(&self, name: &str, text: impl Into<String>) {
        self.entity.invoke(Command::SetUiText {
            name: name.to_owned(),
            text: text.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentTypeId;
    use crate::memory::MemoryEngine;
    use crate::scene::Scene;
    use crate::script::ScriptTable;

    #[test]
    fn test_type_names_match_catalog_ids() {
        assert_eq!(Transform::component_type_id(), ComponentTypeId::TRANSFORM);
        assert_eq!(Rigidbody::component_type_id(), ComponentTypeId::RIGIDBODY);
        assert_eq!(Rigidbody2D::component_type_id(), ComponentTypeId::RIGIDBODY_2D);
        assert_eq!(Audio::component_type_id(), ComponentTypeId::AUDIO);
        assert_eq!(Text::component_type_id(), ComponentTypeId::TEXT);
        assert_eq!(
            SpriteRenderer2D::component_type_id(),
            ComponentTypeId::SPRITE_RENDERER_2D
        );
        assert_eq!(
            SpriteAnimation::component_type_id(),
            ComponentTypeId::SPRITE_ANIMATION
        );
        assert_eq!(CircleRenderer::component_type_id(), ComponentTypeId::CIRCLE_RENDERER);
        assert_eq!(BoxCollider2D::component_type_id(), ComponentTypeId::BOX_COLLIDER_2D);
        assert_eq!(
            CircleCollider2D::component_type_id(),
            ComponentTypeId::CIRCLE_COLLIDER_2D
        );
        assert_eq!(UI::component_type_id(), ComponentTypeId::UI);
    }

    #[test]
    fn test_transform_euler_and_directions() {
        let engine = MemoryEngine::new();
        let scripts = ScriptTable::new();
        let scene = Scene::new(&engine, &scripts);
        let t = scene.entity(engine.spawn("Camera")).add_component::<Transform>();

        t.euler_angles()
            .set(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        assert!(t.forward().abs_diff_eq(Vec3::NEG_X, 1e-5));
        assert!(t.up().abs_diff_eq(Vec3::Y, 1e-5));
        assert!(t.right().abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn test_rigidbody_commands_reach_engine() {
        let engine = MemoryEngine::new();
        let scripts = ScriptTable::new();
        let scene = Scene::new(&engine, &scripts);
        let e = scene.entity(engine.spawn("Player"));
        let rb = e.add_component::<Rigidbody>();

        rb.add_force(Vec3::new(0.0, 0.0, 500.0));
        rb.set_position(Vec3::new(1.0, 2.0, 3.0), true);
        rb.add_linear_velocity(Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(
            engine.commands(),
            vec![
                (e.id(), Command::AddForce(Vec3::new(0.0, 0.0, 500.0))),
                (
                    e.id(),
                    Command::SetPosition {
                        position: Vec3::new(1.0, 2.0, 3.0),
                        activate: true
                    }
                ),
                (e.id(), Command::AddLinearVelocity(Vec3::new(0.0, 10.0, 0.0))),
            ]
        );
        assert_eq!(e.translation().get(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(rb.linear_velocity().get(), Vec3::new(0.0, 10.0, 0.0));
        assert!(rb.is_active());
        assert_eq!(rb.center_of_mass_position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_rigidbody_activation() {
        let engine = MemoryEngine::new();
        let scripts = ScriptTable::new();
        let scene = Scene::new(&engine, &scripts);
        let rb = scene.entity(engine.spawn("Box")).add_component::<Rigidbody>();
        rb.deactivate_body();
        assert!(!rb.is_active());
        rb.activate_body();
        assert!(rb.is_active());
        rb.destroy_body();
        assert!(!rb.entity().has_component::<Rigidbody>());
    }

    #[test]
    fn test_rigidbody2d_impulse_and_contacts() {
        let engine = MemoryEngine::new();
        let scripts = ScriptTable::new();
        let scene = Scene::new(&engine, &scripts);
        let e = scene.entity(engine.spawn("Player"));
        let rb2d = e.add_component::<Rigidbody2D>();

        rb2d.apply_linear_impulse_to_center(Vec2::new(0.0, 3.5), false);
        assert_eq!(rb2d.velocity().get(), Vec2::new(0.0, 3.5));

        assert!(!rb2d.is_contact_with_tag("Floor"));
        assert_eq!(rb2d.contact_with_tag(), "");
        engine.set_contacts(e.id(), ["Floor"]);
        assert!(rb2d.is_contact_with_tag("Floor"));
        assert_eq!(rb2d.contact_with_tag(), "Floor");
    }

    #[test]
    fn test_audio_properties_and_playback() {
        let engine = MemoryEngine::new();
        let scripts = ScriptTable::new();
        let scene = Scene::new(&engine, &scripts);
        let e = scene.entity(engine.spawn("Gun"));
        let audio = e.add_component::<Audio>();

        assert_eq!(audio.volume().get(), 1.0);
        audio.volume().set(0.25);
        audio.looping().set(true);
        audio.name().set("shoot".into());
        audio.play_overlapping();

        assert_eq!(audio.volume().get(), 0.25);
        assert!(audio.looping().get());
        assert_eq!(audio.name().get(), "shoot");
        assert_eq!(engine.commands(), vec![(e.id(), Command::PlayOverlapping)]);
    }

    #[test]
    fn test_ui_labels() {
        let engine = MemoryEngine::new();
        let scripts = ScriptTable::new();
        let scene = Scene::new(&engine, &scripts);
        let ui = scene.entity(engine.spawn("HUD")).add_component::<UI>();

        assert_eq!(ui.text("FPSCounter"), "");
        ui.set_text("FPSCounter", "60.00 FPS");
        assert_eq!(ui.text("FPSCounter"), "60.00 FPS");
    }

    #[test]
    fn test_sprite_and_animation() {
        let engine = MemoryEngine::new();
        let scripts = ScriptTable::new();
        let scene = Scene::new(&engine, &scripts);
        let e = scene.entity(engine.spawn("Hero"));
        let sprite = e.add_component::<SpriteRenderer2D>();
        let anim = e.add_component::<SpriteAnimation>();

        assert_eq!(sprite.color().get(), Vec4::ONE);
        sprite.flip_x().set(true);
        assert!(sprite.flip_x().get());
        anim.play_state("Walk");
        assert_eq!(anim.active_state().get(), "Walk");
    }

    #[test]
    fn test_collider_defaults_and_writes() {
        let engine = MemoryEngine::new();
        let scripts = ScriptTable::new();
        let scene = Scene::new(&engine, &scripts);
        let e = scene.entity(engine.spawn("Floor"));
        let collider = e.add_component::<BoxCollider2D>();

        assert_eq!(collider.size().get(), Vec2::splat(0.5));
        collider.friction().set(0.9);
        assert_eq!(collider.friction().get(), 0.9);

        let circle = e.add_component::<CircleCollider2D>();
        assert_eq!(circle.radius().get(), 0.5);
    }

    #[test]
    fn test_writes_to_dead_entity_are_ignored() {
        let engine = MemoryEngine::new();
        let scripts = ScriptTable::new();
        let scene = Scene::new(&engine, &scripts);
        let e = scene.entity(engine.spawn("Ghost"));
        let text = e.add_component::<Text>();
        e.destroy();

        text.text().set("boo".into());
        assert_eq!(text.text().get(), "");
        assert_eq!(text.kerning().get(), 0.0);
    }
}
