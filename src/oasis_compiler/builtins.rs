// Builtin commands, functions and verbs of the OASIS engine
//
// Commands (sc*) are statements and produce no value; functions (sf*) are
// expressions with a return type. Opcodes are the assembler symbols defined
// by the engine sources.
//
// Some engine opcodes are not listed because the compiler emits them itself:
// SC_ASSIGN and SC_SETFLAG for assignments, SC_JUMP, SC_JUMP_IF, SC_JUMP_REL
// and SC_JUMP_REL_IF for control flow, and the SF_* operators for
// expressions. Those operators are reached through operator syntax and
// variable fetches only; `sfAdd(1, 2)` is an unknown function.

use crate::oasis_compiler::symbols::ValueType;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Builtin {
    pub opcode: &'static str,
    /// `ValueType::None` for commands
    pub return_type: ValueType,
    pub params: Vec<ValueType>,
}

impl Builtin {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

use crate::oasis_compiler::symbols::ValueType::{Bool as BOOL, Byte as BYTE, Word as WORD};

fn command(opcode: &'static str, params: &[ValueType]) -> Builtin {
    Builtin {
        opcode,
        return_type: ValueType::None,
        params: params.to_vec(),
    }
}

fn function(opcode: &'static str, return_type: ValueType, params: &[ValueType]) -> Builtin {
    Builtin {
        opcode,
        return_type,
        params: params.to_vec(),
    }
}

lazy_static! {
    pub static ref COMMANDS: HashMap<&'static str, Builtin> = {
        let mut m = HashMap::new();
        m.insert("scStopScript", command("SC_STOP_SCRIPT", &[]));
        m.insert("scRestartScript", command("SC_RESTART_SCRIPT", &[]));
        m.insert("scWaitEvent", command("SC_WAIT_EVENT", &[BYTE]));
        m.insert("scActorWalkTo", command("SC_ACTOR_WALKTO", &[BYTE, BYTE, BYTE]));
        m.insert("scActorTalk", command("SC_ACTOR_TALK", &[BYTE, BYTE, BYTE]));
        m.insert("scWaitForActor", command("SC_WAIT_FOR_ACTOR", &[BYTE]));
        m.insert("scDelay", command("SC_DELAY", &[BYTE]));
        m.insert("scFollowActor", command("SC_FOLLOW_ACTOR", &[BYTE]));
        m.insert("scSetAnimstate", command("SC_SET_ANIMSTATE", &[BYTE, BYTE]));
        m.insert("scPanCamera", command("SC_PAN_CAMERA", &[BYTE]));
        m.insert("scWaitForCamera", command("SC_WAIT_FOR_CAMERA", &[]));
        m.insert("scLoadRoom", command("SC_LOAD_ROOM", &[BYTE]));
        m.insert("scSetEgo", command("SC_SET_EGO", &[BYTE]));
        m.insert("scBreakHere", command("SC_BREAK_HERE", &[]));
        m.insert("scSetPosition", command("SC_SET_OBJECT_POS", &[BYTE, BYTE, BYTE, BYTE]));
        m.insert("scChangeRoomAndStop", command("SC_CHANGE_ROOM_AND_STOP", &[BYTE]));
        m.insert("scExecuteAction", command("SC_EXECUTE_ACTION", &[BYTE, BYTE, BYTE, BYTE]));
        m.insert("scChainScript", command("SC_CHAIN_SCRIPT", &[BYTE]));
        m.insert("scSpawnScript", command("SC_SPAWN_SCRIPT", &[BYTE]));
        m.insert("scSetEvents", command("SC_SET_EVENTS", &[BYTE]));
        m.insert("scClearEvents", command("SC_CLEAR_EVENTS", &[BYTE]));
        m.insert("scRunObjectCode", command("SC_RUN_OBJECT_CODE", &[BYTE, BYTE, BYTE]));
        m.insert("scSetCameraAt", command("SC_SET_CAMERA_AT", &[BYTE]));
        m.insert("scSetFadeEffect", command("SC_SET_FADEEFFECT", &[BYTE]));
        m.insert("scCursorOn", command("SC_CURSOR_ON", &[BOOL]));
        m.insert("scLookDirection", command("SC_LOOK_DIRECTION", &[BYTE, BYTE]));
        m.insert("scSetState", command("SC_SET_STATE", &[BYTE, BYTE]));
        m.insert("scSetCostume", command("SC_SET_COSTUME", &[BYTE, BYTE, BYTE]));
        m.insert("scDisableVerb", command("SC_DISABLE_VERB", &[BYTE, BOOL]));
        m.insert("scSetWalkboxAsWalkable", command("SC_SET_WBASWALKABLE", &[BYTE, BOOL]));
        m.insert("scSetNextWalkbox", command("SC_SET_NEXTWB", &[BYTE, BYTE, BYTE]));
        m.insert("scPlayTune", command("SC_PLAY_TUNE", &[BYTE]));
        m.insert("scWaitForTune", command("SC_WAIT_FOR_TUNE", &[]));
        m.insert("scStopTune", command("SC_STOP_TUNE", &[]));
        m.insert("scShowVerbs", command("SC_SHOW_VERBS", &[BOOL]));
        m.insert("scPrint", command("SC_PRINT", &[BYTE, BYTE]));
        m.insert("scPrintAt", command("SC_PRINT_AT", &[BYTE, BYTE, BYTE, BYTE]));
        m.insert("scRedrawScreen", command("SC_REDRAW_SCREEN", &[]));
        m.insert("scPutInInventory", command("SC_PUT_IN_INVENTORY", &[BYTE]));
        m.insert("scRemoveFromInventory", command("SC_REMOVE_FROM_INVENTORY", &[BYTE]));
        m.insert("scLoadResource", command("SC_LOAD_RESOURCE", &[BYTE, BYTE]));
        m.insert("scNukeResource", command("SC_NUKE_RESOURCE", &[BYTE, BYTE]));
        m.insert("scLockResource", command("SC_LOCK_RESOURCE", &[BYTE, BYTE]));
        m.insert("scUnlockResource", command("SC_UNLOCK_RESOURCE", &[BYTE, BYTE]));
        m.insert("scLoadObjectToGame", command("SC_LOAD_OBJECT", &[BYTE]));
        m.insert("scRemoveObjectFromGame", command("SC_REMOVE_OBJECT", &[BYTE]));
        m.insert("scSetOverrideJump", command("SC_SET_OVERRIDE", &[WORD]));
        m.insert("scClearRoomArea", command("SC_CLEAR_ROOMAREA", &[]));
        m.insert("scStartDialog", command("SC_START_DIALOG", &[]));
        m.insert("scEndDialog", command("SC_END_DIALOG", &[]));
        m.insert("scLoadDialog", command("SC_LOAD_DIALOG", &[BYTE]));
        m.insert("scActivateDlgOption", command("SC_ACTIVATE_DLGOPT", &[BYTE, BOOL]));
        m.insert("scFreezeScript", command("SC_FREEZE_SCRIPT", &[BYTE, BOOL]));
        m.insert("scFreezeAllScripts", command("SC_FREEZE_ALL_SCRIPTS", &[BOOL]));
        m.insert("scTerminateScript", command("SC_TERMINATE_SCRIPT", &[BYTE]));
        m
    };

    pub static ref FUNCTIONS: HashMap<&'static str, Builtin> = {
        let mut m = HashMap::new();
        m.insert("sfGetRand", function("SF_GETRAND", BYTE, &[]));
        m.insert("sfGetRandInt", function("SF_GETRANDINT", BYTE, &[BYTE, BYTE]));
        m.insert("sfGetEgo", function("SF_GET_EGO", BYTE, &[]));
        m.insert("sfGetTalking", function("SF_GET_TALKING", BYTE, &[]));
        // The engine only exposes the column opcode under this name
        m.insert("sfGetRow", function("SF_GET_COL", BYTE, &[BYTE]));
        m.insert("sfGetRoom", function("SF_GET_ROOM", BYTE, &[BYTE]));
        m.insert("sfGetWalkbox", function("SF_GET_WALKBOX", BYTE, &[BYTE]));
        m.insert("sfGetFacing", function("SF_GET_FACING", BYTE, &[BYTE]));
        m.insert("sfGetCostumeID", function("SF_GET_COSTID", BYTE, &[BYTE]));
        m.insert("sfGetCostumeNo", function("SF_GET_COSTNO", BYTE, &[BYTE]));
        m.insert("sfGetAnimstate", function("SF_GET_ANIMSTATE", BYTE, &[BYTE]));
        m.insert("sfGetState", function("SF_GET_STATE", BYTE, &[BYTE]));
        m.insert("sfGetWalkRow", function("SF_GET_WALKROW", BYTE, &[BYTE]));
        m.insert("sfGetWalkCol", function("SF_GET_WALKCOL", BYTE, &[BYTE]));
        m.insert("sfGetWalkFaceDir", function("SF_GET_WALKFACEDIR", BYTE, &[BYTE]));
        m.insert("sfGetColorSpeech", function("SF_GET_COLORSPEECH", BYTE, &[BYTE]));
        m.insert("sfGetSizeX", function("SF_GET_SIZEX", BYTE, &[BYTE]));
        m.insert("sfGetSizeY", function("SF_GET_SIZEY", BYTE, &[BYTE]));
        m.insert("sfGetAnimSpeed", function("SF_GET_ANIMSPEED", BYTE, &[BYTE]));
        m.insert("sfGetIsActor", function("SF_IS_ACTOR", BOOL, &[BYTE]));
        m.insert("sfIsProp", function("SF_IS_PROP", BOOL, &[BYTE]));
        m.insert("sfIsNotMoving", function("SF_IS_NOTMOVING", BOOL, &[BYTE]));
        m.insert("sfGetClosestActor", function("SF_GET_CLOSESTACTOR", BYTE, &[BYTE]));
        m.insert("sfGetDistance", function("SF_GET_DISTANCE", BYTE, &[BYTE, BYTE]));
        m.insert("sfGetObjectAt", function("SF_GET_OBJAT", BYTE, &[BYTE, BYTE]));
        m.insert("sfISObjectInInventory", function("SF_IS_OBJINVENTORY", BOOL, &[BYTE]));
        m.insert("sfGetCameraCol", function("SF_GET_CAMERACOL", BYTE, &[]));
        m.insert("sfGetCameraFollowing", function("SF_GET_CAMERAFOLLOWING", BYTE, &[]));
        m.insert("sfGetFadeEffect", function("SF_GET_FADEEFFECT", BYTE, &[]));
        m.insert("sfIsCameraInAction", function("SF_IS_CAMERAINACTION", BOOL, &[]));
        m.insert("sfGetCurrentRoom", function("SF_GET_CURROOM", BYTE, &[]));
        m.insert("sfGetRoomCols", function("SF_GET_ROOMCOLS", BYTE, &[]));
        m.insert("sfIsScriptRunning", function("SF_IS_SCRIPTRUNNING", BOOL, &[BYTE, BYTE]));
        m.insert("sfIsMusicPlaying", function("SF_IS_MUSICPLAYING", BOOL, &[]));
        m.insert("sfIsWalkboxWalkable", function("SF_IS_WALKBOXWALKABLE", BOOL, &[BYTE]));
        m.insert("sfGetNextWalkbox", function("SF_GET_NEXTWALKBOX", BYTE, &[BYTE, BYTE]));
        m.insert("sfGetActorExecutingAction", function("SF_GET_ACTIONACTOR", BYTE, &[]));
        m.insert("sfGetActionVerb", function("SF_GET_ACTIONVERB", BYTE, &[]));
        m.insert("sfGetActionObject1", function("SF_GET_ACTIONOBJ1", BYTE, &[]));
        m.insert("sfGetActionObject2", function("SF_GET_ACTIONOBJ2", BYTE, &[]));
        m
    };

    /// Verb label names recognised in object code, mapped to their opcodes
    pub static ref VERBS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("Give", "VERB_GIVE");
        m.insert("PickUp", "VERB_PICKUP");
        m.insert("Use", "VERB_USE");
        m.insert("Open", "VERB_OPEN");
        m.insert("LookAt", "VERB_LOOKAT");
        m.insert("Push", "VERB_PUSH");
        m.insert("Close", "VERB_CLOSE");
        m.insert("TalkTo", "VERB_TALKTO");
        m.insert("Pull", "VERB_PULL");
        m.insert("WalkTo", "VERB_WALKTO");
        m
    };
}

pub fn lookup_command(name: &str) -> Option<&'static Builtin> {
    COMMANDS.get(name)
}

pub fn lookup_function(name: &str) -> Option<&'static Builtin> {
    FUNCTIONS.get(name)
}

pub fn verb_opcode(label: &str) -> Option<&'static str> {
    VERBS.get(label).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_signatures() {
        let talk = lookup_command("scActorTalk").unwrap();
        assert_eq!(talk.opcode, "SC_ACTOR_TALK");
        assert_eq!(talk.arity(), 3);
        assert_eq!(talk.return_type, ValueType::None);

        let jump = lookup_command("scSetOverrideJump").unwrap();
        assert_eq!(jump.params, vec![ValueType::Word]);
    }

    #[test]
    fn test_function_signatures() {
        let random = lookup_function("sfGetRandInt").unwrap();
        assert_eq!(random.return_type, ValueType::Byte);
        assert_eq!(random.arity(), 2);

        assert_eq!(lookup_function("sfGetRow").map(|f| f.opcode), Some("SF_GET_COL"));
        assert_eq!(
            lookup_function("sfIsMusicPlaying").map(|f| f.return_type),
            Some(ValueType::Bool)
        );
    }

    #[test]
    fn test_registries_are_disjoint() {
        assert!(lookup_function("scDelay").is_none());
        assert!(lookup_command("sfGetEgo").is_none());
        assert!(COMMANDS.keys().all(|name| !FUNCTIONS.contains_key(name)));
    }

    #[test]
    fn test_operator_opcodes_are_not_callable() {
        for name in ["sfAdd", "sfNot", "sfEqual", "sfGetVal", "sfGetFlag"] {
            assert!(lookup_function(name).is_none(), "{} should not be callable", name);
        }
    }

    #[test]
    fn test_verbs() {
        assert_eq!(verb_opcode("LookAt"), Some("VERB_LOOKAT"));
        assert_eq!(verb_opcode("lookat"), None);
        assert_eq!(VERBS.len(), 10);
    }
}
