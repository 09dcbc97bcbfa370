//! Request-scoped conversion service

use bridge_traits::{AccessCredential, DestinationCatalog};
use core_async::sync::CancellationToken;
use core_convert::{Catalogs, ConversionInput, ConversionOrchestrator, PipelineSettings};
use core_runtime::{ConverterConfig, SearchCredentialPolicy};
use provider_spotify::SpotifyConnector;
use provider_youtube::YouTubeConnector;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::contract::{ConversionRequest, ConversionResponse, ErrorBody, RequestContext};
use crate::error::{Result, ServiceError};

/// Entry point for conversions.
///
/// Holds only validated configuration. Catalog clients are built per call
/// from the caller's credentials and dropped when the call returns.
#[derive(Clone)]
pub struct ConversionService {
    config: Arc<ConverterConfig>,
    settings: PipelineSettings,
}

impl ConversionService {
    pub fn new(config: ConverterConfig) -> Result<Self> {
        config.validate()?;
        let settings = PipelineSettings::from(&config);
        Ok(Self {
            config: Arc::new(config),
            settings,
        })
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Run one conversion and render its outcome.
    #[instrument(skip(self, request, context, cancel), fields(owner_id = %context.owner_id))]
    pub async fn convert(
        &self,
        request: ConversionRequest,
        context: RequestContext,
        cancel: &CancellationToken,
    ) -> ConversionResponse {
        let (input, catalogs) = match self.prepare(request, context) {
            Ok(prepared) => prepared,
            Err(error) => {
                warn!(kind = error.kind(), error = %error, "Rejected conversion request");
                return ConversionResponse::Failed(ErrorBody::from(error));
            }
        };

        let orchestrator = ConversionOrchestrator::new(catalogs, self.settings);
        match orchestrator.run(&input, cancel).await {
            Ok(report) => {
                info!(
                    conversion_id = %report.conversion_id,
                    destination_playlist_id = %report.destination_playlist_id,
                    "Conversion completed"
                );
                ConversionResponse::Completed(report.into())
            }
            Err(failure) => ConversionResponse::Failed(failure.into()),
        }
    }

    fn prepare(
        &self,
        request: ConversionRequest,
        context: RequestContext,
    ) -> Result<(ConversionInput, Catalogs)> {
        if context.user_credential.is_empty() {
            return Err(ServiceError::InvalidRequest {
                message: "user credential is empty".to_string(),
            });
        }

        let owner_id = context.owner_id.trim();
        if owner_id.is_empty() {
            return Err(ServiceError::InvalidRequest {
                message: "owner id is empty".to_string(),
            });
        }

        let search_credential = self.resolve_search_credential(&context)?;

        let playlist_name = request
            .destination_playlist_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.config.default_playlist_name.as_str())
            .to_string();

        let destination: Arc<dyn DestinationCatalog> =
            Arc::new(self.spotify_connector(context.user_credential.clone()));
        let search: Arc<dyn DestinationCatalog> = match search_credential {
            Some(credential) => Arc::new(self.spotify_connector(credential)),
            None => Arc::clone(&destination),
        };

        let catalogs = Catalogs {
            source: Arc::new(YouTubeConnector::new(
                Arc::clone(&self.config.http_client),
                self.config.youtube_api_key.clone(),
                self.config.youtube_api_base.clone(),
            )),
            search,
            destination,
        };

        let input = ConversionInput {
            source_playlist_url: request.source_playlist_url,
            owner_id: owner_id.to_string(),
            playlist_name,
        };

        Ok((input, catalogs))
    }

    /// `None` means searches share the user's destination client.
    fn resolve_search_credential(
        &self,
        context: &RequestContext,
    ) -> Result<Option<AccessCredential>> {
        let dedicated = context
            .search_credential
            .as_ref()
            .filter(|credential| !credential.is_empty())
            .cloned();

        match (dedicated, self.config.search_credential_policy) {
            (Some(credential), _) => Ok(Some(credential)),
            (None, SearchCredentialPolicy::FallbackToUser) => Ok(None),
            (None, SearchCredentialPolicy::RequireDedicated) => {
                Err(ServiceError::SearchCredentialUnavailable)
            }
        }
    }

    fn spotify_connector(&self, credential: AccessCredential) -> SpotifyConnector {
        SpotifyConnector::new(
            Arc::clone(&self.config.http_client),
            credential,
            self.config.spotify_api_base.clone(),
            self.config.rate_limit,
        )
    }
}
