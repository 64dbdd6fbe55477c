//! Multi-platform container image publishing with `docker buildx`.

use crate::engine::context::ReleaseContext;
use crate::plugins::cli_executor::{CommandRunner, Invocation};
use crate::publish::build_args::resolve_build_args;
use crate::publish::{PublishError, Publisher};
use async_trait::async_trait;
use rk_protocol::config_models::ImageTarget;
use rk_protocol::release_models::PublishedRelease;
use std::sync::Arc;
use tracing::info;

/// Builds one image per platform, then stitches them into a manifest list
/// tagged with the release version and `latest`.
pub struct DockerPublisher {
    target: ImageTarget,
    runner: Arc<dyn CommandRunner>,
}

impl DockerPublisher {
    pub fn new(target: ImageTarget, runner: Arc<dyn CommandRunner>) -> Self {
        Self { target, runner }
    }

    /// Commands for publishing `version`, in execution order.
    ///
    /// One `buildx build` per platform comes first, then one
    /// `imagetools create` per image name.
    pub fn build_invocations(
        &self,
        context: &ReleaseContext,
        version: &str,
    ) -> Result<Vec<Invocation>, PublishError> {
        let build_args =
            resolve_build_args(&self.target.build_args, |name| context.var(name).map(str::to_string))?;

        let mut invocations = Vec::new();

        for platform in &self.target.platforms {
            let slug = platform_slug(platform);
            let mut build = Invocation::new("docker", context.cwd())
                .args(["buildx", "build", "--platform"])
                .arg(platform.as_str());

            for image in &self.target.image_names {
                build = build.arg("--tag").arg(format!("{image}:{version}-{slug}"));
            }
            for (key, value) in &build_args {
                build = build.arg("--build-arg").arg(format!("{key}={value}"));
            }
            if let Some(dockerfile) = &self.target.dockerfile {
                build = build.arg("--file").arg(dockerfile.as_str());
            }

            invocations.push(build.arg("--push").arg(self.target.context.as_str()));
        }

        for image in &self.target.image_names {
            let manifest = Invocation::new("docker", context.cwd())
                .args(["buildx", "imagetools", "create"])
                .args(["--tag".to_string(), format!("{image}:{version}")])
                .args(["--tag".to_string(), format!("{image}:latest")])
                .args(
                    self.target
                        .platforms
                        .iter()
                        .map(|platform| format!("{image}:{version}-{}", platform_slug(platform))),
                );
            invocations.push(manifest);
        }

        Ok(invocations)
    }

    fn references(&self, version: &str) -> Vec<String> {
        self.target
            .image_names
            .iter()
            .flat_map(|image| [format!("{image}:{version}"), format!("{image}:latest")])
            .collect()
    }
}

/// `linux/arm/v7` becomes `linux-arm-v7`.
pub fn platform_slug(platform: &str) -> String {
    platform.replace('/', "-")
}

#[async_trait]
impl Publisher for DockerPublisher {
    async fn publish(
        &self,
        context: &ReleaseContext,
        _others: &[PublishedRelease],
    ) -> Result<PublishedRelease, PublishError> {
        let next = context.next_release().ok_or(PublishError::NoRelease)?;

        for invocation in self.build_invocations(context, &next.version)? {
            self.runner.run(&invocation).await?;
        }

        info!(
            images = self.target.image_names.len(),
            platforms = self.target.platforms.len(),
            version = %next.version,
            "pushed container images"
        );

        Ok(PublishedRelease {
            target: self.target.path.clone(),
            name: "Docker images".to_string(),
            url: None,
            references: self.references(&next.version),
        })
    }
}
