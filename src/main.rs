use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use eframe::egui;
use serde_json::Value;

use profilecrop::app::ProfileCropApp;
use profilecrop::config::{
    CropConfig, DEFAULT_AVATAR_VIEWPORT, DEFAULT_COVER_VIEWPORT_HEIGHT,
    DEFAULT_COVER_VIEWPORT_WIDTH, DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_ZOOM, DEFAULT_ZOOM_STEP,
};
use profilecrop::editor::validation::ImageFile;
use profilecrop::gateway::JsonFileGateway;
use profilecrop::image_utils::{decode_image, natural_size, render_cover, render_view};
use profilecrop::render::{cover_layout, AvatarLayout, AvatarView, CroppedAvatar};

type DynError = Box<dyn std::error::Error + Send + Sync>;
type AppResult = std::result::Result<Box<dyn eframe::App>, DynError>;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Avatar and cover-photo crop editor"
)]
struct Cli {
    /// Directory the profile image payload is stored in
    #[arg(short, long, global = true, default_value = ".")]
    store: PathBuf,

    #[command(flatten)]
    viewports: ViewportArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ViewportArgs {
    /// Side of the square avatar editing viewport
    #[arg(long, global = true, default_value_t = DEFAULT_AVATAR_VIEWPORT)]
    avatar_viewport: f32,

    /// Width of the cover editing viewport
    #[arg(long, global = true, default_value_t = DEFAULT_COVER_VIEWPORT_WIDTH)]
    cover_width: f32,

    /// Height of the cover editing viewport
    #[arg(long, global = true, default_value_t = DEFAULT_COVER_VIEWPORT_HEIGHT)]
    cover_height: f32,

    /// Largest accepted upload, in bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: u64,

    /// Highest avatar zoom
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ZOOM)]
    max_zoom: f32,
}

impl ViewportArgs {
    fn config(&self) -> Result<CropConfig> {
        let config = CropConfig {
            avatar_viewport: self.avatar_viewport,
            cover_viewport_width: self.cover_width,
            cover_viewport_height: self.cover_height,
            max_file_size: self.max_file_size,
            max_zoom: self.max_zoom,
            zoom_step: DEFAULT_ZOOM_STEP,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive editor
    Edit {
        /// Replace the avatar with this image
        #[arg(short, long)]
        avatar: Option<PathBuf>,

        /// Replace the cover with this image
        #[arg(short, long)]
        cover: Option<PathBuf>,
    },
    /// Render the stored avatar (and cover) to PNG files
    Render {
        /// Display size of the avatar in pixels
        #[arg(long, default_value_t = 140)]
        size: u32,

        /// Output file for the avatar
        #[arg(short, long, default_value = "avatar.png")]
        output: PathBuf,

        /// Also render the cover strip at this width
        #[arg(long)]
        cover_strip_width: Option<u32>,

        /// Output file for the cover strip
        #[arg(long, default_value = "cover.png")]
        cover_output: PathBuf,
    },
    /// Print the stored payload and the layout at a display size
    Inspect {
        #[arg(long, default_value_t = 140.0)]
        size: f32,
    },
}

fn load_source(source: &str) -> Result<image::DynamicImage> {
    let file = ImageFile::read(Path::new(source))
        .with_context(|| format!("Unable to read {source}"))?;
    decode_image(&file.bytes).with_context(|| format!("Unable to decode {source}"))
}

fn stored_payload(gateway: &JsonFileGateway) -> Result<Value> {
    gateway
        .load_raw()?
        .ok_or_else(|| anyhow!("Nothing stored in {}", gateway.path().display()))
}

fn stored_avatar(payload: &Value, size: f32, config: &CropConfig) -> CroppedAvatar<'static> {
    CroppedAvatar::new(
        payload.get("avatar").and_then(Value::as_str),
        payload.get("profileCrop"),
        size,
        config,
    )
}

fn render(
    gateway: &JsonFileGateway,
    config: &CropConfig,
    size: u32,
    output: &Path,
    cover: Option<(u32, &Path)>,
) -> Result<()> {
    let payload = stored_payload(gateway)?;
    let view = stored_avatar(&payload, size as f32, config).view();
    let source = match &view {
        AvatarView::Image { src, .. } => Some(load_source(src)?),
        AvatarView::Placeholder => None,
    };
    render_view(&view, source.as_ref(), size)?
        .save(output)
        .with_context(|| format!("Unable to write {}", output.display()))?;
    log::info!("wrote {}", output.display());

    if let Some((width, cover_output)) = cover {
        let Some(src) = payload.get("coverImage").and_then(Value::as_str) else {
            return Err(anyhow!("No cover image stored"));
        };
        let image = load_source(src)?;
        let offset = payload.get("coverOffset").and_then(Value::as_f64).unwrap_or(0.0) as f32;
        let display = egui::vec2(
            width as f32,
            width as f32 * config.cover_viewport_height / config.cover_viewport_width,
        );
        let layout = cover_layout(
            offset,
            natural_size(&image),
            display,
            config.cover_viewport_height,
        );
        render_cover(&image, &layout, display)?
            .save(cover_output)
            .with_context(|| format!("Unable to write {}", cover_output.display()))?;
        log::info!("wrote {}", cover_output.display());
    }
    Ok(())
}

fn inspect(gateway: &JsonFileGateway, config: &CropConfig, size: f32) -> Result<()> {
    let payload = stored_payload(gateway)?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    match stored_avatar(&payload, size, config).view() {
        AvatarView::Placeholder => println!("{size}px: placeholder"),
        AvatarView::Image {
            layout: AvatarLayout::CoverFit,
            ..
        } => println!("{size}px: cover-fit"),
        AvatarView::Image {
            layout: AvatarLayout::Cropped(layout),
            ..
        } => println!(
            "{size}px: size {:.2}px {:.2}px, position {:.2}px {:.2}px",
            layout.size.x, layout.size.y, layout.position.x, layout.position.y
        ),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.viewports.config()?;
    let gateway = JsonFileGateway::new(&cli.store);

    match cli.command {
        Command::Edit { avatar, cover } => {
            let native_options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default().with_inner_size([
                    config.cover_viewport_width.max(config.avatar_viewport + 200.0) + 48.0,
                    config.cover_viewport_height + config.avatar_viewport + 260.0,
                ]),
                ..Default::default()
            };
            eframe::run_native(
                "profilecrop",
                native_options,
                Box::new(move |cc: &eframe::CreationContext<'_>| -> AppResult {
                    let app = ProfileCropApp::new(
                        cc,
                        config,
                        gateway,
                        avatar.as_deref(),
                        cover.as_deref(),
                    )?;
                    Ok(Box::new(app))
                }),
            )
            .map_err(|err| anyhow!("{err}"))?;
        }
        Command::Render {
            size,
            output,
            cover_strip_width,
            cover_output,
        } => render(
            &gateway,
            &config,
            size,
            &output,
            cover_strip_width.map(|width| (width, cover_output.as_path())),
        )?,
        Command::Inspect { size } => inspect(&gateway, &config, size)?,
    }

    Ok(())
}
