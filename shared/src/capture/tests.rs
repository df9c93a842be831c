use super::*;
use std::cell::Cell;
use std::rc::Rc;

/// 记录 stop 次数的假流
struct FakeStream {
    stops: Rc<Cell<u32>>,
}

impl FakeStream {
    fn new() -> (Self, Rc<Cell<u32>>) {
        let stops = Rc::new(Cell::new(0));
        (
            Self {
                stops: stops.clone(),
            },
            stops,
        )
    }
}

impl CameraStream for FakeStream {
    fn stop(&mut self) {
        self.stops.set(self.stops.get() + 1);
    }
}

fn jpeg() -> EncodedImage {
    EncodedImage::from_data_url("data:image/jpeg;base64,/9j/4AAQSkZJRg==").unwrap()
}

// =========================================================
// EncodedImage
// =========================================================

#[test]
fn test_encoded_image_validation() {
    assert!(EncodedImage::from_data_url("data:image/png;base64,iVBORw0KGgo=").is_ok());
    assert_eq!(
        EncodedImage::from_data_url("data:text/plain;base64,aGVsbG8="),
        Err(ValidationError::NotAnImage)
    );
    assert_eq!(
        EncodedImage::from_data_url("data:image/jpeg,rawbytes"),
        Err(ValidationError::NotAnImage)
    );
    assert_eq!(
        EncodedImage::from_data_url("data:image/jpeg;base64,"),
        Err(ValidationError::NotAnImage)
    );
}

#[test]
fn test_encoded_image_size_limit() {
    // 每 4 个字符解码为 3 字节
    let chars = (MAX_PROOF_BYTES / 3 + 1) * 4;
    let oversized = format!("data:image/jpeg;base64,{}", "A".repeat(chars));
    match EncodedImage::from_data_url(oversized) {
        Err(ValidationError::ImageTooLarge { size, max }) => {
            assert!(size > max);
            assert_eq!(max, MAX_PROOF_BYTES);
        }
        other => panic!("unexpected: {:?}", other),
    }

    assert_eq!(jpeg().byte_len(), 10);
}

// =========================================================
// 状态转换
// =========================================================

#[test]
fn test_camera_capture_submit_flow() {
    let (stream, stops) = FakeStream::new();
    let mut flow = ProofCapture::for_delivery("d42");
    assert!(!flow.can_submit());

    flow.camera_started(stream);
    assert!(flow.is_camera_active());
    assert!(!flow.can_submit());

    assert!(flow.capture(jpeg()));
    assert_eq!(stops.get(), 1, "capture must release the camera");
    assert!(flow.can_submit());
    assert_eq!(flow.preview(), Some(&jpeg()));

    let submission = flow.begin_submit().unwrap();
    assert_eq!(submission.delivery_id, "d42");
    assert!(flow.is_submitting());
    assert!(!flow.can_submit());
    assert_eq!(flow.begin_submit(), Err(CaptureError::AlreadySubmitting));

    flow.submit_succeeded();
    assert_eq!(flow.phase().name(), "idle");
    assert!(flow.preview().is_none());

    let req: UploadProofRequest = submission.into();
    assert_eq!(req.delivery_id, "d42");
    assert!(req.image_data.starts_with("data:image/jpeg;base64,"));
}

#[test]
fn test_file_selection_skips_camera() {
    let mut flow: ProofCapture<FakeStream> = ProofCapture::for_delivery("d1");
    flow.file_selected(jpeg());
    assert_eq!(flow.phase().name(), "captured");
    assert!(flow.can_submit());
}

#[test]
fn test_file_selection_while_camera_active_releases_stream() {
    let (stream, stops) = FakeStream::new();
    let mut flow = ProofCapture::for_delivery("d1");
    flow.camera_started(stream);
    flow.file_selected(jpeg());
    assert_eq!(stops.get(), 1);
    assert!(flow.camera_stream().is_none());
}

#[test]
fn test_capture_requires_active_camera() {
    let mut flow: ProofCapture<FakeStream> = ProofCapture::for_delivery("d1");
    assert!(!flow.capture(jpeg()));
    assert_eq!(flow.phase().name(), "idle");
}

#[test]
fn test_submit_without_image_is_rejected() {
    let mut flow: ProofCapture<FakeStream> = ProofCapture::for_delivery("d1");
    assert_eq!(
        flow.begin_submit(),
        Err(CaptureError::Invalid(ValidationError::MissingProofImage))
    );
}

#[test]
fn test_submit_without_delivery_id_is_rejected() {
    let mut flow: ProofCapture<FakeStream> = ProofCapture::new();
    flow.file_selected(jpeg());
    assert!(!flow.can_submit());
    assert_eq!(
        flow.begin_submit(),
        Err(CaptureError::Invalid(ValidationError::MissingDeliveryId))
    );

    flow.set_delivery_id("  d7 ");
    assert_eq!(flow.begin_submit().unwrap().delivery_id, "d7");
}

#[test]
fn test_failed_submit_keeps_image() {
    let mut flow: ProofCapture<FakeStream> = ProofCapture::for_delivery("d1");
    flow.file_selected(jpeg());
    flow.begin_submit().unwrap();

    flow.submit_failed("Request failed with status code 500");
    assert_eq!(flow.phase().name(), "captured");
    assert_eq!(flow.preview(), Some(&jpeg()));
    assert_eq!(flow.error(), Some("Request failed with status code 500"));
    assert!(flow.can_submit());
}

#[test]
fn test_close_during_submit_keeps_image_for_retry() {
    let mut flow: ProofCapture<FakeStream> = ProofCapture::for_delivery("d1");
    flow.file_selected(jpeg());
    flow.begin_submit().unwrap();

    flow.close();
    flow.set_delivery_id("d2");
    assert!(flow.is_submitting());
    assert_eq!(flow.delivery_id(), "d1");

    flow.submit_failed("Request failed with status code 500");
    assert_eq!(flow.phase().name(), "captured");
    assert_eq!(flow.preview(), Some(&jpeg()));

    flow.close();
    assert_eq!(flow.phase().name(), "idle");
    flow.set_delivery_id("d2");
    assert_eq!(flow.delivery_id(), "d2");
}

#[test]
fn test_camera_denied_is_recoverable() {
    let mut flow: ProofCapture<FakeStream> = ProofCapture::for_delivery("d1");
    flow.camera_failed("Permission denied");
    assert_eq!(flow.error(), Some("Permission denied"));
    assert_eq!(flow.phase().name(), "idle");

    flow.file_selected(jpeg());
    assert!(flow.error().is_none());
    assert!(flow.can_submit());
}

#[test]
fn test_discard_returns_to_idle() {
    let mut flow: ProofCapture<FakeStream> = ProofCapture::for_delivery("d1");
    flow.file_selected(jpeg());
    flow.discard();
    assert!(flow.preview().is_none());
    assert!(!flow.can_submit());
}

// =========================================================
// 摄像头释放
// =========================================================

#[test]
fn test_close_releases_camera() {
    let (stream, stops) = FakeStream::new();
    let mut flow = ProofCapture::for_delivery("d1");
    flow.camera_started(stream);
    flow.close();
    assert_eq!(stops.get(), 1);
    assert!(!flow.is_camera_active());
}

#[test]
fn test_drop_releases_camera() {
    let (stream, stops) = FakeStream::new();
    {
        let mut flow = ProofCapture::for_delivery("d1");
        flow.camera_started(stream);
    }
    assert_eq!(stops.get(), 1);
}

#[test]
fn test_restarting_camera_replaces_old_stream() {
    let (first, first_stops) = FakeStream::new();
    let (second, second_stops) = FakeStream::new();
    let mut flow = ProofCapture::for_delivery("d1");
    flow.camera_started(first);
    flow.camera_started(second);
    assert_eq!(first_stops.get(), 1);
    assert_eq!(second_stops.get(), 0);
    flow.close();
    assert_eq!(second_stops.get(), 1);
}

#[test]
fn test_stream_arriving_during_submit_is_stopped() {
    let (stream, stops) = FakeStream::new();
    let mut flow = ProofCapture::for_delivery("d1");
    flow.file_selected(jpeg());
    flow.begin_submit().unwrap();
    flow.camera_started(stream);
    assert_eq!(stops.get(), 1);
    assert!(flow.is_submitting());
}
