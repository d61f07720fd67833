// # Health-serviced mapping engine
//
// Records with an attached health check publish `pool-0`'s values as the
// IP list of an `http_service_config`. The probe URL is assembled from the
// health check's protocol, host, port and path; every healthy member is
// served.

use tracing::warn;
use url::Url;
use zonesync_core::{
    DynamicDescriptor, Error, HealthCheck, HealthCheckProtocol, Pool, PoolValue, Result, Rule,
};

use crate::wire::HttpServiceConfig;

/// User agent sent by the provider's health probes
pub const HEALTHCHECK_USER_AGENT: &str = "zonesync-healthcheck";

/// Serve every member whose probe succeeds
pub const STRATEGY_ALL: &str = "all";

/// Probe URL for `check` on the record named `fqdn`
pub fn monitoring_url(check: &HealthCheck, fqdn: &str) -> Result<Url> {
    if check.protocol == HealthCheckProtocol::Tcp {
        return Err(Error::validation(
            "Health-serviced records require an HTTP or HTTPS health check",
        ));
    }

    let path = if check.path.starts_with('/') {
        check.path.clone()
    } else {
        format!("/{}", check.path)
    };
    let raw = format!(
        "{}://{}:{}{}",
        check.protocol.scheme(),
        check.host(fqdn),
        check.port,
        path
    );

    Url::parse(&raw)
        .map_err(|e| Error::validation(format!("Invalid health check URL {}: {}", raw, e)))
}

/// Build the `http_service_config` from `pool-0` and the health check
pub fn encode(
    descriptor: &DynamicDescriptor,
    check: &HealthCheck,
    fqdn: &str,
) -> Result<HttpServiceConfig> {
    let id = DynamicDescriptor::pool_id_for(0);
    let pool = descriptor
        .pool(&id)
        .ok_or_else(|| Error::validation(format!("Health-serviced record has no `{}`", id)))?;

    Ok(HttpServiceConfig {
        ips: pool.values.iter().map(|v| v.value.clone()).collect(),
        must_contain: None,
        url: monitoring_url(check, fqdn)?.to_string(),
        user_agent: Some(HEALTHCHECK_USER_AGENT.to_string()),
        strategy: STRATEGY_ALL.to_string(),
    })
}

/// Rebuild the descriptor and health check from an `http_service_config`
pub fn decode(config: &HttpServiceConfig, fqdn: &str) -> Option<(DynamicDescriptor, HealthCheck)> {
    if config.ips.is_empty() {
        return None;
    }

    let url = match Url::parse(&config.url) {
        Ok(url) => url,
        Err(e) => {
            warn!("Ignoring http service config with bad URL {}: {}", config.url, e);
            return None;
        }
    };

    let protocol = match url.scheme() {
        "http" => HealthCheckProtocol::Http,
        "https" => HealthCheckProtocol::Https,
        other => {
            warn!("Ignoring http service config with scheme {}", other);
            return None;
        }
    };
    let host = url.host_str()?;
    let port = url.port_or_known_default()?;

    let check = HealthCheck {
        protocol,
        host: (host != fqdn.trim_end_matches('.')).then(|| host.to_string()),
        port,
        path: url.path().to_string(),
    };

    let id = DynamicDescriptor::pool_id_for(0);
    let values = config.ips.iter().map(|ip| PoolValue::new(ip.clone())).collect();
    let descriptor = DynamicDescriptor::new()
        .with_pool(id.clone(), Pool::new(values))
        .with_rule(Rule::default_rule(id));

    Some((descriptor, check))
}
