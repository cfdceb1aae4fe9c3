use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::template::{get_att, reference, sub, Template};
use crate::{StackConfig, StackResult};

pub const USER_POOL: &str = "UserPool";
pub const USER_POOL_CLIENT: &str = "UserPoolClient";
pub const FUNCTION_ROLE: &str = "AuthFunctionRole";
pub const FUNCTION: &str = "AuthFunction";
pub const API: &str = "AuthApi";
pub const API_PROXY_RESOURCE: &str = "AuthApiProxyResource";
pub const API_ROOT_METHOD: &str = "AuthApiRootMethod";
pub const API_PROXY_METHOD: &str = "AuthApiProxyMethod";
pub const API_DEPLOYMENT: &str = "AuthApiDeployment";
pub const API_INVOKE_PERMISSION: &str = "AuthApiInvokePermission";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PasswordPolicy {
    pub minimum_length: u32,
    pub require_symbols: bool,
    pub require_numbers: bool,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            minimum_length: 8,
            require_symbols: false,
            require_numbers: true,
            require_uppercase: true,
            require_lowercase: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserPoolPolicies {
    pub password_policy: PasswordPolicy,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdminCreateUserConfig {
    pub allow_admin_create_user_only: bool,
}

/// `AWS::Cognito::UserPool` properties
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserPoolProperties {
    pub user_pool_name: String,
    pub username_attributes: Vec<String>,
    pub auto_verified_attributes: Vec<String>,
    pub admin_create_user_config: AdminCreateUserConfig,
    pub policies: UserPoolPolicies,
}

/// `AWS::Cognito::UserPoolClient` properties
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserPoolClientProperties {
    pub user_pool_id: serde_json::Value,
    pub client_name: String,
    pub generate_secret: bool,
    pub explicit_auth_flows: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageCode {
    pub image_uri: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionEnvironment {
    pub variables: serde_json::Map<String, serde_json::Value>,
}

/// `AWS::Lambda::Function` properties for a container image function
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionProperties {
    pub function_name: String,
    pub package_type: String,
    pub code: ImageCode,
    pub role: serde_json::Value,
    pub timeout: u32,
    pub memory_size: u32,
    pub environment: FunctionEnvironment,
}

fn user_pool(config: &StackConfig) -> UserPoolProperties {
    UserPoolProperties {
        user_pool_name: config.resource_name("userpool"),
        // Sign in with email
        username_attributes: vec!["email".to_string()],
        auto_verified_attributes: vec!["email".to_string()],
        // Self sign-up enabled
        admin_create_user_config: AdminCreateUserConfig {
            allow_admin_create_user_only: false,
        },
        policies: UserPoolPolicies {
            password_policy: PasswordPolicy::default(),
        },
    }
}

fn user_pool_client(config: &StackConfig) -> UserPoolClientProperties {
    UserPoolClientProperties {
        user_pool_id: reference(USER_POOL),
        client_name: config.resource_name("client"),
        generate_secret: false,
        explicit_auth_flows: vec![
            "ALLOW_USER_PASSWORD_AUTH".to_string(),
            "ALLOW_REFRESH_TOKEN_AUTH".to_string(),
        ],
    }
}

fn function(config: &StackConfig) -> FunctionProperties {
    let mut variables = serde_json::Map::new();
    variables.insert("USER_POOL_CLIENT_ID".to_string(), reference(USER_POOL_CLIENT));
    variables.insert("RUST_LOG".to_string(), json!("info"));

    FunctionProperties {
        function_name: config.resource_name("auth"),
        package_type: "Image".to_string(),
        code: ImageCode {
            image_uri: config.image_uri.clone(),
        },
        role: get_att(FUNCTION_ROLE, "Arn"),
        timeout: 10,
        memory_size: 128,
        environment: FunctionEnvironment { variables },
    }
}

fn proxy_method(resource_id: serde_json::Value) -> serde_json::Value {
    json!({
        "RestApiId": reference(API),
        "ResourceId": resource_id,
        "HttpMethod": "ANY",
        "AuthorizationType": "NONE",
        "Integration": {
            "Type": "AWS_PROXY",
            "IntegrationHttpMethod": "POST",
            "Uri": sub(&format!(
                "arn:${{AWS::Partition}}:apigateway:${{AWS::Region}}:lambda:path/2015-03-31/functions/${{{}.Arn}}/invocations",
                FUNCTION
            )),
        },
    })
}

/// Declare the user pool, its client, the container-image function and the REST API in front of it
pub fn synthesize(config: &StackConfig) -> StackResult<Template> {
    let mut template = Template::new(format!(
        "{} authentication stack ({})",
        config.app_name, config.environment
    ));

    // Cognito
    template.add_resource(USER_POOL, "AWS::Cognito::UserPool", user_pool(config))?;
    template.add_resource(USER_POOL_CLIENT, "AWS::Cognito::UserPoolClient", user_pool_client(config))?;

    // Lambda
    template.add_resource(
        FUNCTION_ROLE,
        "AWS::IAM::Role",
        json!({
            "AssumeRolePolicyDocument": {
                "Version": "2012-10-17",
                "Statement": [{
                    "Effect": "Allow",
                    "Principal": { "Service": "lambda.amazonaws.com" },
                    "Action": "sts:AssumeRole",
                }],
            },
            "ManagedPolicyArns": [
                sub("arn:${AWS::Partition}:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole"),
            ],
        }),
    )?;
    template.add_resource(FUNCTION, "AWS::Lambda::Function", function(config))?;

    // API Gateway: every path and method is proxied to the function
    template.add_resource(
        API,
        "AWS::ApiGateway::RestApi",
        json!({ "Name": config.resource_name("api") }),
    )?;
    template.add_resource(
        API_PROXY_RESOURCE,
        "AWS::ApiGateway::Resource",
        json!({
            "RestApiId": reference(API),
            "ParentId": get_att(API, "RootResourceId"),
            "PathPart": "{proxy+}",
        }),
    )?;
    template.add_resource(
        API_ROOT_METHOD,
        "AWS::ApiGateway::Method",
        proxy_method(get_att(API, "RootResourceId")),
    )?;
    template.add_resource(
        API_PROXY_METHOD,
        "AWS::ApiGateway::Method",
        proxy_method(reference(API_PROXY_RESOURCE)),
    )?;
    template.add_resource_depending_on(
        API_DEPLOYMENT,
        "AWS::ApiGateway::Deployment",
        json!({
            "RestApiId": reference(API),
            "StageName": config.stage_name,
        }),
        &[API_ROOT_METHOD, API_PROXY_METHOD],
    )?;
    template.add_resource(
        API_INVOKE_PERMISSION,
        "AWS::Lambda::Permission",
        json!({
            "Action": "lambda:InvokeFunction",
            "FunctionName": get_att(FUNCTION, "Arn"),
            "Principal": "apigateway.amazonaws.com",
            "SourceArn": sub(&format!(
                "arn:${{AWS::Partition}}:execute-api:${{AWS::Region}}:${{AWS::AccountId}}:${{{}}}/*/*",
                API
            )),
        }),
    )?;

    template.add_output("UserPoolId", reference(USER_POOL), "The ID of the Cognito User Pool");
    template.add_output(
        "UserPoolClientId",
        reference(USER_POOL_CLIENT),
        "The ID of the Cognito User Pool Client",
    );
    template.add_output(
        "LambdaFunctionArn",
        get_att(FUNCTION, "Arn"),
        "The ARN of the Docker Lambda Function",
    );
    template.add_output(
        "ApiGatewayUrl",
        sub(&format!(
            "https://${{{}}}.execute-api.${{AWS::Region}}.${{AWS::URLSuffix}}/{}/",
            API, config.stage_name
        )),
        "The URL of the API Gateway",
    );

    info!(
        "Synthesized {} resources and {} outputs",
        template.resources.len(),
        template.outputs.len()
    );
    Ok(template)
}
