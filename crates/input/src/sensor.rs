use cubeview_scene::SceneObject;
use glam::Vec3;
use std::io::{BufRead, BufReader, Read};
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

/// Errors from the external pose-sensor mapper.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SensorError {
    #[error("rotation reading has zero magnitude")]
    DegenerateRotation,
    #[error("target object has {0} transform steps, pose mapping needs 2")]
    MissingTransformSteps(usize),
}

/// One externally supplied pose: a position and an axis-angle rotation
/// vector whose magnitude is the angle in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseReading {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl PoseReading {
    /// Parse one feed line: six whitespace-separated floats,
    /// `px py pz rx ry rz`. Anything else is `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut values = [0.0f32; 6];
        let mut fields = line.split_whitespace();
        for value in &mut values {
            *value = fields.next()?.parse().ok()?;
        }
        if fields.next().is_some() {
            return None;
        }
        Some(Self {
            position: Vec3::new(values[0], values[1], values[2]),
            rotation: Vec3::new(values[3], values[4], values[5]),
        })
    }
}

/// A non-blocking pose supplier, polled once per idle tick.
pub trait PoseSource {
    /// Return the latest reading if one arrived since the last poll.
    fn try_read_pose(&mut self) -> Option<PoseReading>;
}

/// Write a pose into the designated object's transform stack: the reading's
/// sign-adjusted position into step 0's translation, and its normalized
/// rotation vector (axis sign-adjusted, magnitude converted to degrees)
/// into step 1.
///
/// A zero-magnitude rotation cannot be normalized; the whole update is
/// rejected and the object left untouched.
pub fn apply_pose(object: &mut SceneObject, pose: &PoseReading) -> Result<(), SensorError> {
    let angle_rad = pose.rotation.length();
    if angle_rad == 0.0 {
        return Err(SensorError::DegenerateRotation);
    }
    if object.transform_steps.len() < 2 {
        return Err(SensorError::MissingTransformSteps(
            object.transform_steps.len(),
        ));
    }

    let axis = pose.rotation / angle_rad;
    object.transform_steps[0].translation =
        Vec3::new(-pose.position.x, -pose.position.y, pose.position.z);
    object.transform_steps[1].rotation_axis = Vec3::new(-axis.x, -axis.y, axis.z);
    object.transform_steps[1].rotation_angle_deg = angle_rad.to_degrees();
    Ok(())
}

/// Pose feed over a byte stream: one whitespace-separated line of six floats
/// (`px py pz rx ry rz`) per reading.
///
/// A background thread blocks on the stream and hands parsed readings over a
/// channel, so the event loop's poll never waits. Malformed lines are logged
/// and skipped. Dropping the source closes the channel and the reader thread
/// winds down on its next send.
pub struct PipePoseSource {
    receiver: Receiver<PoseReading>,
}

impl PipePoseSource {
    /// Spawn the reader over an arbitrary stream.
    pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
        let (sender, receiver) = channel();
        std::thread::spawn(move || read_loop(reader, &sender));
        Self { receiver }
    }

    /// Read poses from standard input, the transport the original marker
    /// pipeline used.
    pub fn stdin() -> Self {
        Self::from_reader(std::io::stdin())
    }
}

fn read_loop(reader: impl Read, sender: &Sender<PoseReading>) {
    for line in BufReader::new(reader).lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("pose feed read error: {e}");
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match PoseReading::parse(&line) {
            Some(pose) => {
                if sender.send(pose).is_err() {
                    return;
                }
            }
            None => tracing::warn!("discarding malformed pose line: {line:?}"),
        }
    }
}

impl PoseSource for PipePoseSource {
    fn try_read_pose(&mut self) -> Option<PoseReading> {
        match self.receiver.try_recv() {
            Ok(pose) => Some(pose),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubeview_scene::marker_scene;
    use std::f32::consts::PI;
    use std::time::Duration;

    #[test]
    fn pose_updates_translation_and_rotation_steps() {
        let mut scene = marker_scene();
        let object = scene.object_mut(1).unwrap();
        let pose = PoseReading {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::new(0.0, 0.0, PI),
        };
        apply_pose(object, &pose).unwrap();

        assert_eq!(
            object.transform_steps[0].translation,
            Vec3::new(-1.0, -2.0, 3.0)
        );
        assert_eq!(object.transform_steps[1].rotation_axis, Vec3::Z);
        assert!((object.transform_steps[1].rotation_angle_deg - 180.0).abs() < 1e-4);
    }

    #[test]
    fn pose_negates_x_and_y_axis_components() {
        let mut scene = marker_scene();
        let object = scene.object_mut(1).unwrap();
        let pose = PoseReading {
            position: Vec3::ZERO,
            rotation: Vec3::new(PI / 2.0, 0.0, 0.0),
        };
        apply_pose(object, &pose).unwrap();
        assert_eq!(object.transform_steps[1].rotation_axis, Vec3::NEG_X);
        assert!((object.transform_steps[1].rotation_angle_deg - 90.0).abs() < 1e-4);
    }

    #[test]
    fn zero_rotation_reading_changes_nothing() {
        let mut scene = marker_scene();
        let object = scene.object_mut(1).unwrap();
        let before = object.clone();
        let pose = PoseReading {
            position: Vec3::new(4.0, 5.0, 6.0),
            rotation: Vec3::ZERO,
        };
        assert_eq!(
            apply_pose(object, &pose),
            Err(SensorError::DegenerateRotation)
        );
        assert_eq!(*object, before);
    }

    #[test]
    fn too_few_steps_is_rejected_without_mutation() {
        let mut scene = marker_scene();
        let object = scene.object_mut(0).unwrap();
        object.transform_steps.truncate(1);
        let before = object.clone();
        let pose = PoseReading {
            position: Vec3::ONE,
            rotation: Vec3::Z,
        };
        assert_eq!(
            apply_pose(object, &pose),
            Err(SensorError::MissingTransformSteps(1))
        );
        assert_eq!(*object, before);
    }

    #[test]
    fn parses_six_float_lines() {
        let pose = PoseReading::parse("1 2 3 0.1 0.2 0.3").unwrap();
        assert_eq!(pose.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(pose.rotation, Vec3::new(0.1, 0.2, 0.3));

        assert!(PoseReading::parse("1 2 3").is_none());
        assert!(PoseReading::parse("1 2 3 4 5 six").is_none());
        assert!(PoseReading::parse("1 2 3 4 5 6 7").is_none());
    }

    #[test]
    fn pipe_source_delivers_then_runs_dry() {
        let feed = "0.5 0 0 0 0 1.5708\nnot a pose\n1 1 1 0 1 0\n";
        let mut source = PipePoseSource::from_reader(feed.as_bytes());

        // The reader thread races the poll; wait for both good lines.
        let mut readings = Vec::new();
        for _ in 0..200 {
            if let Some(pose) = source.try_read_pose() {
                readings.push(pose);
                if readings.len() == 2 {
                    break;
                }
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].position, Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(readings[1].rotation, Vec3::Y);
        assert!(source.try_read_pose().is_none());
    }
}
