use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::device::DeviceChoice;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding custom_cnn.onnx, resnet18.onnx and mobilenet_v2.onnx
    #[arg(long, env = "IMGCLS_MODELS_DIR", default_value = "ai_models")]
    pub models_dir: PathBuf,

    /// Address the HTTP server binds to
    #[arg(long, env = "IMGCLS_ADDR", default_value = "0.0.0.0:8000")]
    pub addr: SocketAddr,

    /// Directory of static assets, mounted at /static
    #[arg(long, env = "IMGCLS_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Compute device; `auto` prefers CUDA, then CoreML, then CPU
    #[arg(long, env = "IMGCLS_DEVICE", value_enum, default_value_t = DeviceChoice::Auto)]
    pub device: DeviceChoice,

    /// Largest accepted upload, in bytes
    #[arg(long, env = "IMGCLS_MAX_UPLOAD_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,

    /// ONNX Runtime intra-op threads per session
    #[arg(long, env = "IMGCLS_INTRA_THREADS")]
    pub intra_threads: Option<usize>,
}
