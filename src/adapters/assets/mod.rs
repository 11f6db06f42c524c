pub mod env_template_assets;
