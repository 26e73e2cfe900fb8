pub mod iou_face_tracker;
pub mod scripted_detector;
