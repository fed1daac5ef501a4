//! The bootstrap template and its export contract.
//!
//! The template's public surface is its set of exported output names.
//! Downstream stacks import these by name, so the export list is captured
//! as data ([`EXPECTED_EXPORTS`]) and held stable across template versions:
//! no silent addition or removal of exports.

use ruststrap_model::BOOTSTRAP_VERSION;
use serde_json::{Value, json};

/// Export names the rendered template must produce, exactly.
///
/// `${Qualifier}` is interpolated by CloudFormation at deploy time from the
/// template's `Qualifier` parameter. The asset-key ARN export predates the
/// current template generation and is preserved for consumers that import
/// it by name.
pub const EXPECTED_EXPORTS: &[&str] = &["CdkBootstrap-${Qualifier}-FileAssetKeyArn"];

/// Render the bootstrap template body.
///
/// The default for the `Qualifier` parameter comes from configuration; every
/// other parameter default matches the reconciler's omission behavior (an
/// omitted parameter falls back to the default declared here).
#[must_use]
pub fn render_template(qualifier: &str) -> Value {
    json!({
        "Description": "This stack includes resources needed to deploy into this environment",
        "Parameters": {
            "FileAssetsBucketName": {
                "Type": "String",
                "Default": "",
                "Description": "The name of the S3 bucket used for file assets"
            },
            "FileAssetsBucketKmsKeyId": {
                "Type": "String",
                "Default": "",
                "Description": "Custom KMS key ID to use for encrypting file assets"
            },
            "PublicAccessBlockConfiguration": {
                "Type": "String",
                "Default": "true",
                "AllowedValues": ["true", "false"],
                "Description": "Whether to block public access on the file assets bucket"
            },
            "TrustedAccounts": {
                "Type": "CommaDelimitedList",
                "Default": "",
                "Description": "List of AWS accounts trusted to deploy into this environment"
            },
            "CloudFormationExecutionPolicies": {
                "Type": "CommaDelimitedList",
                "Default": "",
                "Description": "Managed policy ARNs that constrain the deployment role"
            },
            "Qualifier": {
                "Type": "String",
                "Default": qualifier,
                "Description": "Identifier to distinguish multiple bootstrap stacks in the same environment"
            }
        },
        "Conditions": {
            "HasCustomFileAssetsBucketName": {
                "Fn::Not": [{ "Fn::Equals": ["", { "Ref": "FileAssetsBucketName" }] }]
            },
            "HasCustomKmsKey": {
                "Fn::Not": [{ "Fn::Equals": ["", { "Ref": "FileAssetsBucketKmsKeyId" }] }]
            },
            "UsePublicAccessBlockConfiguration": {
                "Fn::Equals": ["true", { "Ref": "PublicAccessBlockConfiguration" }]
            },
            "HasTrustedAccounts": {
                "Fn::Not": [{ "Fn::Equals": ["", { "Fn::Join": ["", { "Ref": "TrustedAccounts" }] }] }]
            }
        },
        "Resources": {
            "FileAssetsBucketEncryptionKey": {
                "Type": "AWS::KMS::Key",
                "Properties": {
                    "KeyPolicy": {
                        "Statement": [
                            {
                                "Action": ["kms:*"],
                                "Effect": "Allow",
                                "Principal": { "AWS": { "Ref": "AWS::AccountId" } },
                                "Resource": "*"
                            }
                        ]
                    }
                }
            },
            "StagingBucket": {
                "Type": "AWS::S3::Bucket",
                "Properties": {
                    "BucketName": {
                        "Fn::If": [
                            "HasCustomFileAssetsBucketName",
                            { "Ref": "FileAssetsBucketName" },
                            { "Ref": "AWS::NoValue" }
                        ]
                    },
                    "BucketEncryption": {
                        "ServerSideEncryptionConfiguration": [{
                            "ServerSideEncryptionByDefault": {
                                "SSEAlgorithm": "aws:kms",
                                "KMSMasterKeyID": {
                                    "Fn::If": [
                                        "HasCustomKmsKey",
                                        { "Ref": "FileAssetsBucketKmsKeyId" },
                                        { "Fn::GetAtt": ["FileAssetsBucketEncryptionKey", "Arn"] }
                                    ]
                                }
                            }
                        }]
                    },
                    "PublicAccessBlockConfiguration": {
                        "Fn::If": [
                            "UsePublicAccessBlockConfiguration",
                            {
                                "BlockPublicAcls": true,
                                "BlockPublicPolicy": true,
                                "IgnorePublicAcls": true,
                                "RestrictPublicBuckets": true
                            },
                            { "Ref": "AWS::NoValue" }
                        ]
                    }
                }
            },
            "DeploymentActionRole": {
                "Type": "AWS::IAM::Role",
                "Properties": {
                    "AssumeRolePolicyDocument": {
                        "Statement": [{
                            "Action": "sts:AssumeRole",
                            "Effect": "Allow",
                            "Principal": {
                                "AWS": {
                                    "Fn::If": [
                                        "HasTrustedAccounts",
                                        { "Ref": "TrustedAccounts" },
                                        { "Ref": "AWS::AccountId" }
                                    ]
                                }
                            }
                        }]
                    }
                }
            },
            "CloudFormationExecutionRole": {
                "Type": "AWS::IAM::Role",
                "Properties": {
                    "AssumeRolePolicyDocument": {
                        "Statement": [{
                            "Action": "sts:AssumeRole",
                            "Effect": "Allow",
                            "Principal": { "Service": "cloudformation.amazonaws.com" }
                        }]
                    },
                    "ManagedPolicyArns": { "Ref": "CloudFormationExecutionPolicies" }
                }
            }
        },
        "Outputs": {
            "BucketName": {
                "Description": "The name of the S3 bucket owned by the bootstrap stack",
                "Value": { "Ref": "StagingBucket" }
            },
            "FileAssetKeyArn": {
                "Description": "The ARN of the KMS key used to encrypt file assets",
                "Value": { "Fn::GetAtt": ["FileAssetsBucketEncryptionKey", "Arn"] },
                "Export": {
                    "Name": { "Fn::Sub": "CdkBootstrap-${Qualifier}-FileAssetKeyArn" }
                }
            },
            "BootstrapVersion": {
                "Description": "The version of the bootstrap resources in this environment",
                "Value": BOOTSTRAP_VERSION.to_string()
            }
        }
    })
}

/// Extract the export names from a rendered template body.
///
/// `Fn::Sub` export names are returned as their unresolved pattern string,
/// which is what the contract is stated in terms of.
#[must_use]
pub fn template_exports(template: &Value) -> Vec<String> {
    let Some(outputs) = template.get("Outputs").and_then(Value::as_object) else {
        return Vec::new();
    };

    outputs
        .values()
        .filter_map(|output| output.get("Export"))
        .filter_map(|export| export.get("Name"))
        .filter_map(|name| match name {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => map
                .get("Fn::Sub")
                .and_then(Value::as_str)
                .map(str::to_owned),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_embed_qualifier_default() {
        let template = render_template("hnb659fds");
        assert_eq!(
            template["Parameters"]["Qualifier"]["Default"],
            json!("hnb659fds")
        );
    }

    #[test]
    fn test_should_record_bootstrap_version_output() {
        let template = render_template("hnb659fds");
        assert_eq!(
            template["Outputs"]["BootstrapVersion"]["Value"],
            json!(BOOTSTRAP_VERSION.to_string())
        );
        // The version output is not exported.
        assert!(template["Outputs"]["BootstrapVersion"].get("Export").is_none());
    }

    #[test]
    fn test_should_extract_no_exports_from_empty_template() {
        assert!(template_exports(&json!({})).is_empty());
        assert!(template_exports(&json!({ "Outputs": {} })).is_empty());
    }

    #[test]
    fn test_should_extract_literal_export_names() {
        let template = json!({
            "Outputs": {
                "A": { "Value": "x", "Export": { "Name": "literal-name" } },
                "B": { "Value": "y" }
            }
        });
        assert_eq!(template_exports(&template), vec!["literal-name"]);
    }
}
