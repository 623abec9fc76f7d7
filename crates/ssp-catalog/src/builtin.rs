//! # Built-in Reference Table
//!
//! A subset of NIST SP 800-53 Rev. 5: all twenty families and the controls
//! that appear across the LOW, MODERATE and HIGH baselines most often.
//! Descriptions are condensed statements, not the full catalog prose.

use ssp_core::ControlId;

use crate::catalog::{Catalog, ControlFamily, ControlMetadata};

pub(crate) const FAMILIES: &[(&str, &str)] = &[
    ("AC", "Access Control"),
    ("AT", "Awareness and Training"),
    ("AU", "Audit and Accountability"),
    ("CA", "Assessment, Authorization, and Monitoring"),
    ("CM", "Configuration Management"),
    ("CP", "Contingency Planning"),
    ("IA", "Identification and Authentication"),
    ("IR", "Incident Response"),
    ("MA", "Maintenance"),
    ("MP", "Media Protection"),
    ("PE", "Physical and Environmental Protection"),
    ("PL", "Planning"),
    ("PM", "Program Management"),
    ("PS", "Personnel Security"),
    ("PT", "PII Processing and Transparency"),
    ("RA", "Risk Assessment"),
    ("SA", "System and Services Acquisition"),
    ("SC", "System and Communications Protection"),
    ("SI", "System and Information Integrity"),
    ("SR", "Supply Chain Risk Management"),
];

pub(crate) const CONTROLS: &[(&str, &str, &str)] = &[
    // AC
    ("AC-1", "Policy and Procedures", "Develop, document and disseminate an access control policy and procedures, and review and update them on a defined frequency."),
    ("AC-2", "Account Management", "Define allowed account types, assign account managers, and create, enable, modify, disable and remove accounts in accordance with policy."),
    ("AC-2(1)", "Automated System Account Management", "Support the management of system accounts using automated mechanisms."),
    ("AC-2(2)", "Automated Temporary and Emergency Account Management", "Automatically remove or disable temporary and emergency accounts after a defined time period."),
    ("AC-2(3)", "Disable Accounts", "Disable accounts when they have expired, are no longer associated with a user, violate policy, or have been inactive for a defined period."),
    ("AC-2(4)", "Automated Audit Actions", "Automatically audit account creation, modification, enabling, disabling and removal actions."),
    ("AC-3", "Access Enforcement", "Enforce approved authorizations for logical access to information and system resources."),
    ("AC-4", "Information Flow Enforcement", "Enforce approved authorizations for controlling the flow of information within the system and between connected systems."),
    ("AC-5", "Separation of Duties", "Identify and document duties of individuals requiring separation and define system access authorizations to support it."),
    ("AC-6", "Least Privilege", "Employ the principle of least privilege, allowing only authorized accesses necessary to accomplish assigned tasks."),
    ("AC-6(1)", "Authorize Access to Security Functions", "Authorize access for defined individuals or roles to security functions and security-relevant information."),
    ("AC-6(2)", "Non-privileged Access for Nonsecurity Functions", "Require users of privileged accounts to use non-privileged accounts when accessing nonsecurity functions."),
    ("AC-7", "Unsuccessful Logon Attempts", "Enforce a limit of consecutive invalid logon attempts and lock the account or delay the next prompt when exceeded."),
    ("AC-8", "System Use Notification", "Display an approved system use notification message before granting access to the system."),
    ("AC-9", "Previous Logon Notification", "Notify the user, upon successful logon, of the date and time of the last logon."),
    ("AC-10", "Concurrent Session Control", "Limit the number of concurrent sessions for each account to a defined number."),
    ("AC-11", "Device Lock", "Prevent further access to the system by initiating a device lock after a defined period of inactivity."),
    ("AC-12", "Session Termination", "Automatically terminate a user session after defined conditions or trigger events."),
    ("AC-14", "Permitted Actions Without Identification or Authentication", "Identify user actions that can be performed without identification or authentication."),
    ("AC-17", "Remote Access", "Establish usage restrictions and implementation guidance for each type of remote access allowed, and authorize it before connection."),
    ("AC-17(1)", "Monitoring and Control", "Employ automated mechanisms to monitor and control remote access methods."),
    ("AC-17(2)", "Protection of Confidentiality and Integrity Using Encryption", "Implement cryptographic mechanisms to protect the confidentiality and integrity of remote access sessions."),
    ("AC-18", "Wireless Access", "Establish configuration requirements and connection guidance for wireless access, and authorize it before connection."),
    ("AC-19", "Access Control for Mobile Devices", "Establish configuration and connection requirements for organization-controlled mobile devices."),
    ("AC-20", "Use of External Systems", "Establish terms and conditions for authorized individuals to access the system from external systems."),
    ("AC-22", "Publicly Accessible Content", "Designate individuals authorized to make information publicly accessible and review content before posting."),
    // AT
    ("AT-1", "Policy and Procedures", "Develop, document and disseminate an awareness and training policy and procedures."),
    ("AT-2", "Literacy Training and Awareness", "Provide security and privacy literacy training to system users as part of initial training and at a defined frequency."),
    ("AT-2(2)", "Insider Threat", "Provide literacy training on recognizing and reporting potential indicators of insider threat."),
    ("AT-3", "Role-based Training", "Provide role-based security and privacy training to personnel with assigned roles and responsibilities."),
    ("AT-4", "Training Records", "Document and monitor information security and privacy training activities and retain individual training records."),
    // AU
    ("AU-1", "Policy and Procedures", "Develop, document and disseminate an audit and accountability policy and procedures."),
    ("AU-2", "Event Logging", "Identify the types of events the system is capable of logging in support of the audit function."),
    ("AU-3", "Content of Audit Records", "Ensure audit records contain what type of event occurred, when and where it occurred, its source, outcome and associated identities."),
    ("AU-4", "Audit Log Storage Capacity", "Allocate audit log storage capacity to accommodate defined retention requirements."),
    ("AU-5", "Response to Audit Logging Process Failures", "Alert defined personnel or roles in the event of an audit logging process failure and take defined additional actions."),
    ("AU-6", "Audit Record Review, Analysis, and Reporting", "Review and analyze system audit records for indications of inappropriate or unusual activity and report findings."),
    ("AU-8", "Time Stamps", "Use internal system clocks to generate time stamps for audit records."),
    ("AU-9", "Protection of Audit Information", "Protect audit information and audit logging tools from unauthorized access, modification and deletion."),
    ("AU-11", "Audit Record Retention", "Retain audit records for a defined time period consistent with the records retention policy."),
    ("AU-12", "Audit Record Generation", "Provide audit record generation capability for the event types the system is capable of auditing."),
    // CA
    ("CA-1", "Policy and Procedures", "Develop, document and disseminate an assessment, authorization and monitoring policy and procedures."),
    ("CA-2", "Control Assessments", "Select the appropriate assessor, develop a control assessment plan, and assess the controls at a defined frequency."),
    ("CA-3", "Information Exchange", "Approve and manage the exchange of information between the system and other systems using agreements."),
    ("CA-5", "Plan of Action and Milestones", "Develop and update a plan of action and milestones documenting planned remediation of weaknesses."),
    ("CA-6", "Authorization", "Assign a senior official as the authorizing official and ensure the system is authorized before commencing operations."),
    ("CA-7", "Continuous Monitoring", "Develop a system-level continuous monitoring strategy and implement continuous monitoring in accordance with it."),
    ("CA-9", "Internal System Connections", "Authorize internal connections of system components and document their interface characteristics."),
    // CM
    ("CM-1", "Policy and Procedures", "Develop, document and disseminate a configuration management policy and procedures."),
    ("CM-2", "Baseline Configuration", "Develop, document and maintain under configuration control a current baseline configuration of the system."),
    ("CM-3", "Configuration Change Control", "Determine and document the types of changes that are configuration-controlled and review proposed changes."),
    ("CM-4", "Impact Analyses", "Analyze changes to the system to determine potential security and privacy impacts prior to implementation."),
    ("CM-5", "Access Restrictions for Change", "Define, document, approve and enforce physical and logical access restrictions associated with changes."),
    ("CM-6", "Configuration Settings", "Establish and document configuration settings for components using security configuration checklists."),
    ("CM-7", "Least Functionality", "Configure the system to provide only mission-essential capabilities and prohibit unneeded functions, ports and services."),
    ("CM-8", "System Component Inventory", "Develop and document an inventory of system components that accurately reflects the system."),
    ("CM-10", "Software Usage Restrictions", "Use software and associated documentation in accordance with contract agreements and copyright laws."),
    ("CM-11", "User-installed Software", "Establish and enforce policies governing the installation of software by users."),
    // CP
    ("CP-1", "Policy and Procedures", "Develop, document and disseminate a contingency planning policy and procedures."),
    ("CP-2", "Contingency Plan", "Develop a contingency plan that identifies essential mission functions and recovery objectives."),
    ("CP-3", "Contingency Training", "Provide contingency training to system users consistent with assigned roles and responsibilities."),
    ("CP-4", "Contingency Plan Testing", "Test the contingency plan to determine its effectiveness and the readiness to execute it."),
    ("CP-9", "System Backup", "Conduct backups of user-level and system-level information and protect their confidentiality, integrity and availability."),
    ("CP-10", "System Recovery and Reconstitution", "Provide for the recovery and reconstitution of the system to a known state after a disruption, compromise or failure."),
    // IA
    ("IA-1", "Policy and Procedures", "Develop, document and disseminate an identification and authentication policy and procedures."),
    ("IA-2", "Identification and Authentication (Organizational Users)", "Uniquely identify and authenticate organizational users and associate that identification with processes acting on their behalf."),
    ("IA-2(1)", "Multi-factor Authentication to Privileged Accounts", "Implement multi-factor authentication for access to privileged accounts."),
    ("IA-2(2)", "Multi-factor Authentication to Non-privileged Accounts", "Implement multi-factor authentication for access to non-privileged accounts."),
    ("IA-4", "Identifier Management", "Manage system identifiers by authorizing, assigning and preventing reuse of identifiers."),
    ("IA-5", "Authenticator Management", "Manage system authenticators by verifying identity before distribution and establishing initial content."),
    ("IA-6", "Authentication Feedback", "Obscure feedback of authentication information during the authentication process."),
    ("IA-7", "Cryptographic Module Authentication", "Implement mechanisms for authentication to a cryptographic module that meet applicable requirements."),
    ("IA-8", "Identification and Authentication (Non-organizational Users)", "Uniquely identify and authenticate non-organizational users or processes acting on their behalf."),
    // IR
    ("IR-1", "Policy and Procedures", "Develop, document and disseminate an incident response policy and procedures."),
    ("IR-2", "Incident Response Training", "Provide incident response training to system users consistent with assigned roles and responsibilities."),
    ("IR-4", "Incident Handling", "Implement an incident handling capability covering preparation, detection, analysis, containment, eradication and recovery."),
    ("IR-5", "Incident Monitoring", "Track and document incidents."),
    ("IR-6", "Incident Reporting", "Require personnel to report suspected incidents to the incident response capability within a defined time period."),
    ("IR-7", "Incident Response Assistance", "Provide an incident response support resource that offers advice and assistance to users."),
    ("IR-8", "Incident Response Plan", "Develop an incident response plan that provides a roadmap for implementing the incident response capability."),
    // MA
    ("MA-1", "Policy and Procedures", "Develop, document and disseminate a system maintenance policy and procedures."),
    ("MA-2", "Controlled Maintenance", "Schedule, document and review records of maintenance, repair and replacement on system components."),
    ("MA-4", "Nonlocal Maintenance", "Approve and monitor nonlocal maintenance and diagnostic activities."),
    ("MA-5", "Maintenance Personnel", "Establish a process for maintenance personnel authorization and maintain a list of authorized organizations or personnel."),
    // MP
    ("MP-1", "Policy and Procedures", "Develop, document and disseminate a media protection policy and procedures."),
    ("MP-2", "Media Access", "Restrict access to defined types of digital and non-digital media to authorized individuals."),
    ("MP-6", "Media Sanitization", "Sanitize system media prior to disposal, release out of organizational control, or release for reuse."),
    ("MP-7", "Media Use", "Restrict or prohibit the use of defined types of system media on defined systems or components."),
    // PE
    ("PE-1", "Policy and Procedures", "Develop, document and disseminate a physical and environmental protection policy and procedures."),
    ("PE-2", "Physical Access Authorizations", "Develop, approve and maintain a list of individuals with authorized access to the facility where the system resides."),
    ("PE-3", "Physical Access Control", "Enforce physical access authorizations at entry and exit points to the facility where the system resides."),
    ("PE-6", "Monitoring Physical Access", "Monitor physical access to the facility to detect and respond to physical security incidents."),
    ("PE-8", "Visitor Access Records", "Maintain visitor access records to the facility for a defined time period."),
    ("PE-12", "Emergency Lighting", "Employ and maintain automatic emergency lighting that activates in the event of a power outage or disruption."),
    ("PE-13", "Fire Protection", "Employ and maintain fire detection and suppression systems supported by an independent energy source."),
    ("PE-14", "Environmental Controls", "Maintain temperature and humidity levels within the facility at acceptable levels."),
    ("PE-15", "Water Damage Protection", "Protect the system from damage resulting from water leakage by providing accessible master shutoff valves."),
    // PL
    ("PL-1", "Policy and Procedures", "Develop, document and disseminate a planning policy and procedures."),
    ("PL-2", "System Security and Privacy Plans", "Develop security and privacy plans for the system that describe the controls in place or planned."),
    ("PL-4", "Rules of Behavior", "Establish and provide to individuals requiring access the rules that describe their responsibilities and expected behavior."),
    ("PL-10", "Baseline Selection", "Select a control baseline for the system."),
    ("PL-11", "Baseline Tailoring", "Tailor the selected control baseline by applying specified tailoring actions."),
    // PM
    ("PM-1", "Information Security Program Plan", "Develop and disseminate an organization-wide information security program plan."),
    ("PM-2", "Information Security Program Leadership Role", "Appoint a senior agency information security officer with the mission and resources to coordinate the program."),
    ("PM-9", "Risk Management Strategy", "Develop a comprehensive strategy to manage security and privacy risk to operations, assets and individuals."),
    // PS
    ("PS-1", "Policy and Procedures", "Develop, document and disseminate a personnel security policy and procedures."),
    ("PS-2", "Position Risk Designation", "Assign a risk designation to all organizational positions and establish screening criteria."),
    ("PS-3", "Personnel Screening", "Screen individuals prior to authorizing access to the system and rescreen according to defined conditions."),
    ("PS-4", "Personnel Termination", "Upon termination, disable system access, terminate credentials and retrieve security-related property."),
    ("PS-5", "Personnel Transfer", "Review and confirm ongoing operational need for current access authorizations when individuals are reassigned."),
    ("PS-6", "Access Agreements", "Develop and document access agreements and require individuals to sign them prior to being granted access."),
    ("PS-7", "External Personnel Security", "Establish personnel security requirements for external providers and monitor provider compliance."),
    ("PS-8", "Personnel Sanctions", "Employ a formal sanctions process for individuals failing to comply with security and privacy policies."),
    // PT
    ("PT-1", "Policy and Procedures", "Develop, document and disseminate a personally identifiable information processing and transparency policy and procedures."),
    ("PT-2", "Authority to Process Personally Identifiable Information", "Determine and document the authority that permits the processing of personally identifiable information."),
    ("PT-3", "Personally Identifiable Information Processing Purposes", "Identify and document the purposes for processing personally identifiable information."),
    // RA
    ("RA-1", "Policy and Procedures", "Develop, document and disseminate a risk assessment policy and procedures."),
    ("RA-2", "Security Categorization", "Categorize the system and the information it processes, stores and transmits."),
    ("RA-3", "Risk Assessment", "Conduct a risk assessment, including identifying threats and vulnerabilities and determining likelihood and impact."),
    ("RA-5", "Vulnerability Monitoring and Scanning", "Monitor and scan for vulnerabilities in the system and hosted applications and remediate them in defined response times."),
    ("RA-7", "Risk Response", "Respond to findings from security and privacy assessments, monitoring and audits in accordance with risk tolerance."),
    // SA
    ("SA-1", "Policy and Procedures", "Develop, document and disseminate a system and services acquisition policy and procedures."),
    ("SA-2", "Allocation of Resources", "Determine the high-level security and privacy requirements for the system in mission and business process planning."),
    ("SA-3", "System Development Life Cycle", "Acquire, develop and manage the system using a life cycle that incorporates security and privacy considerations."),
    ("SA-4", "Acquisition Process", "Include security and privacy requirements and acceptance criteria in the acquisition contract for the system."),
    ("SA-5", "System Documentation", "Obtain or develop administrator and user documentation for the system."),
    ("SA-8", "Security and Privacy Engineering Principles", "Apply systems security and privacy engineering principles in the specification, design and modification of the system."),
    ("SA-9", "External System Services", "Require that providers of external system services comply with organizational security and privacy requirements."),
    ("SA-22", "Unsupported System Components", "Replace system components when support is no longer available from the developer, vendor or manufacturer."),
    // SC
    ("SC-1", "Policy and Procedures", "Develop, document and disseminate a system and communications protection policy and procedures."),
    ("SC-5", "Denial-of-service Protection", "Protect against or limit the effects of defined types of denial-of-service events."),
    ("SC-7", "Boundary Protection", "Monitor and control communications at the external and key internal managed interfaces of the system."),
    ("SC-8", "Transmission Confidentiality and Integrity", "Protect the confidentiality and integrity of transmitted information."),
    ("SC-8(1)", "Cryptographic Protection", "Implement cryptographic mechanisms to prevent unauthorized disclosure and detect changes to information during transmission."),
    ("SC-12", "Cryptographic Key Establishment and Management", "Establish and manage cryptographic keys when cryptography is employed within the system."),
    ("SC-13", "Cryptographic Protection", "Determine the cryptographic uses required and implement the required types of cryptography for each use."),
    ("SC-15", "Collaborative Computing Devices and Applications", "Prohibit remote activation of collaborative computing devices and provide an explicit indication of use."),
    ("SC-20", "Secure Name/Address Resolution Service (Authoritative Source)", "Provide additional data origin authentication and integrity verification artifacts along with authoritative name resolution data."),
    ("SC-28", "Protection of Information at Rest", "Protect the confidentiality and integrity of information at rest."),
    ("SC-39", "Process Isolation", "Maintain a separate execution domain for each executing system process."),
    // SI
    ("SI-1", "Policy and Procedures", "Develop, document and disseminate a system and information integrity policy and procedures."),
    ("SI-2", "Flaw Remediation", "Identify, report and correct system flaws, and install security-relevant updates within a defined time period."),
    ("SI-3", "Malicious Code Protection", "Implement signature-based or non-signature-based malicious code protection mechanisms at system entry and exit points."),
    ("SI-4", "System Monitoring", "Monitor the system to detect attacks, indicators of potential attacks, and unauthorized local, network and remote connections."),
    ("SI-4(2)", "Automated Tools and Mechanisms for Real-time Analysis", "Employ automated tools and mechanisms to support near real-time analysis of events."),
    ("SI-5", "Security Alerts, Advisories, and Directives", "Receive system security alerts, advisories and directives from external organizations on an ongoing basis."),
    ("SI-7", "Software, Firmware, and Information Integrity", "Employ integrity verification tools to detect unauthorized changes to software, firmware and information."),
    ("SI-10", "Information Input Validation", "Check the validity of defined information inputs to the system."),
    ("SI-11", "Error Handling", "Generate error messages that provide information necessary for corrective actions without revealing exploitable information."),
    ("SI-12", "Information Management and Retention", "Manage and retain information within the system and information output in accordance with applicable requirements."),
    // SR
    ("SR-1", "Policy and Procedures", "Develop, document and disseminate a supply chain risk management policy and procedures."),
    ("SR-2", "Supply Chain Risk Management Plan", "Develop a plan for managing supply chain risks associated with the development, acquisition and disposal of the system."),
    ("SR-3", "Supply Chain Controls and Processes", "Establish a process to identify and address weaknesses or deficiencies in the supply chain elements and processes."),
    ("SR-5", "Acquisition Strategies, Tools, and Methods", "Employ acquisition strategies, contract tools and procurement methods to protect against supply chain risks."),
    ("SR-8", "Notification Agreements", "Establish agreements and procedures with entities in the supply chain for notification of compromises."),
    ("SR-10", "Inspection of Systems or Components", "Inspect systems or components to detect tampering."),
    ("SR-11", "Component Authenticity", "Develop and implement anti-counterfeit policy and procedures to detect and prevent counterfeit components."),
    ("SR-12", "Component Disposal", "Dispose of data, documentation, tools or system components using defined techniques and methods."),
];

pub(crate) fn build() -> Catalog {
    let families = FAMILIES
        .iter()
        .map(|(code, title)| ControlFamily {
            code: (*code).to_string(),
            title: (*title).to_string(),
        })
        .collect();
    // Table entries are fixed spellings; the unit tests assert every one parses.
    let controls = CONTROLS.iter().filter_map(|(raw, title, description)| {
        let id = ControlId::parse(raw).ok()?;
        Some(ControlMetadata {
            family: id.family().to_string(),
            id,
            title: (*title).to_string(),
            description: (*description).to_string(),
        })
    });
    Catalog::new(families, controls)
}
