//! Body keypoints and the landmark set produced for a single frame.

/// Body keypoints in MoveNet's 17-point ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPoint {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyPoint {
    pub const COUNT: usize = 17;

    /// All keypoints in model output order.
    pub const ALL: [BodyPoint; Self::COUNT] = [
        BodyPoint::Nose,
        BodyPoint::LeftEye,
        BodyPoint::RightEye,
        BodyPoint::LeftEar,
        BodyPoint::RightEar,
        BodyPoint::LeftShoulder,
        BodyPoint::RightShoulder,
        BodyPoint::LeftElbow,
        BodyPoint::RightElbow,
        BodyPoint::LeftWrist,
        BodyPoint::RightWrist,
        BodyPoint::LeftHip,
        BodyPoint::RightHip,
        BodyPoint::LeftKnee,
        BodyPoint::RightKnee,
        BodyPoint::LeftAnkle,
        BodyPoint::RightAnkle,
    ];
}

/// One detected keypoint in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub point: BodyPoint,
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(point: BodyPoint, x: f32, y: f32) -> Self {
        Self { point, x, y }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// Ordered landmark set for one frame. Empty when no subject was found.
/// Produced fresh per frame and never carried across frames.
#[derive(Debug, Clone, Default)]
pub struct Landmarks(Vec<Landmark>);

impl Landmarks {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self(landmarks)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Position of a keypoint, if it was detected in this frame.
    pub fn get(&self, point: BodyPoint) -> Option<(f32, f32)> {
        self.0
            .iter()
            .find(|landmark| landmark.point == point)
            .map(Landmark::position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_covers_every_keypoint() {
        assert_eq!(BodyPoint::ALL.len(), BodyPoint::COUNT);
        assert_eq!(BodyPoint::ALL[0], BodyPoint::Nose);
        assert_eq!(BodyPoint::ALL[16], BodyPoint::RightAnkle);
    }

    #[test]
    fn get_finds_detected_point() {
        let set = Landmarks::new(vec![
            Landmark::new(BodyPoint::RightShoulder, 120.0, 80.0),
            Landmark::new(BodyPoint::RightElbow, 140.0, 160.0),
        ]);
        assert_eq!(set.get(BodyPoint::RightElbow), Some((140.0, 160.0)));
        assert_eq!(set.get(BodyPoint::RightWrist), None);
    }

    #[test]
    fn empty_set_has_no_points() {
        let set = Landmarks::empty();
        assert!(set.is_empty());
        assert_eq!(set.get(BodyPoint::Nose), None);
    }
}
