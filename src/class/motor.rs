//! Abstraction for handling devices in the motor classes
//!
//! # Implementation
//!
//! ev3dev has three motor classes, `tacho-motor` for motors with position
//! feedback, `dc-motor` for plain DC motors, and `servo-motor` for hobby
//! servos. All are named `motor<N>` in order of registration.
//!
//! Motor control itself (regulation, ramping, holding position) is done by
//! the kernel driver, these only relay setpoints and read back state.
//!
//! See [tacho-motor][1], [dc-motor][2] and [servo-motor][3]
//!
//! [1]: https://docs.ev3dev.org/projects/lego-linux-drivers/en/ev3dev-jessie/motors.html#tacho-motor-subsystem
//! [2]: https://docs.ev3dev.org/projects/lego-linux-drivers/en/ev3dev-jessie/motors.html#dc-motor-subsystem
//! [3]: https://docs.ev3dev.org/projects/lego-linux-drivers/en/ev3dev-jessie/motors.html#servo-motor-subsystem
use crate::{
    attribute::ModeSet,
    class::Device,
    Result,
};

value_enum! {
    /// Commands understood by `tacho-motor` devices
    pub enum MotorCommand("command") {
        /// Run the motor until another command is sent.
        RunForever = "run-forever",

        /// Run to an absolute position specified by `position_sp` and then
        /// stop using the command specified in `stop_command`.
        RunToAbsPos = "run-to-abs-pos",

        /// Run to `position` + `position_sp`, then stop using the command
        /// specified by `stop_command`.
        RunToRelPos = "run-to-rel-pos",

        /// Run the motor for `time_sp` milliseconds and then stop using the
        /// command specified by `stop_command`.
        RunTimed = "run-timed",

        /// Run the motor at the duty cycle specified by `duty_cycle_sp`.
        ///
        /// Unlike other run commands, changing `duty_cycle_sp` while running
        /// *will* take effect immediately.
        RunDirect = "run-direct",

        /// Stop any of the run commands before they are complete using the
        /// command specified by `stop_command`.
        Stop = "stop",

        /// Reset all of the motor parameter attributes to their default
        /// value. This also stops the motor.
        Reset = "reset",
    }
}

value_enum! {
    /// Commands understood by `dc-motor` devices
    pub enum DcMotorCommand("command") {
        /// Run the motor until another command is sent.
        RunForever = "run-forever",

        /// Run the motor for `time_sp` milliseconds.
        RunTimed = "run-timed",

        /// Stop using the command specified by `stop_command`.
        Stop = "stop",
    }
}

value_enum! {
    /// Commands understood by `servo-motor` devices
    pub enum ServoCommand("command") {
        /// Drive servo to the position set in `position_sp`.
        Run = "run",

        /// Remove power from the motor.
        Float = "float",
    }
}

value_enum! {
    /// Motor and encoder polarity
    pub enum Polarity("polarity") {
        /// A positive duty cycle causes clockwise rotation.
        Normal = "normal",

        /// A positive duty cycle causes counter-clockwise rotation.
        Inversed = "inversed",
    }
}

value_enum! {
    /// Whether the tacho motor controller regulates speed
    pub enum SpeedRegulation("speed_regulation") {
        /// Vary the power supplied to maintain `speed_sp`.
        On = "on",

        /// Use the power specified in `duty_cycle_sp`.
        Off = "off",
    }
}

value_enum! {
    /// How a tacho motor stops
    pub enum StopCommand("stop_command") {
        /// Remove power, the motor coasts to a stop.
        Coast = "coast",

        /// Remove power and short the motor terminals, so it stops more
        /// quickly than coasting.
        Brake = "brake",

        /// Actively hold the current position.
        Hold = "hold",
    }
}

value_enum! {
    /// How a DC motor stops
    pub enum DcStopCommand("stop_command") {
        /// Remove power, the motor coasts to a stop.
        Coast = "coast",

        /// Remove power and short the motor terminals.
        Brake = "brake",
    }
}

attributes! {
    /// Attributes of the `tacho-motor` class.
    pub trait TachoMotorAttributes: Device {
        /// Sends a command to the motor controller.
        write set_command: MotorCommand = "command";

        /// Commands supported by the motor controller.
        ///
        /// Not every driver supports every [`MotorCommand`].
        read commands: ModeSet = "commands";

        /// Tacho counts in one rotation of the motor.
        ///
        /// Position and speed are in tacho counts. For linear actuators this
        /// is counts per centimeter.
        read count_per_rot: i32 = "count_per_rot";

        /// Name of the driver that provides this tacho motor device.
        read driver_name: String = "driver_name";

        /// Current duty cycle of the motor, in percent, `-100..=100`.
        read duty_cycle: i32 = "duty_cycle";

        /// Duty cycle setpoint, in percent, `-100..=100`.
        ///
        /// Negative values rotate in reverse. Only used when
        /// `speed_regulation` is off.
        read_write duty_cycle_sp, set_duty_cycle_sp: i32 = "duty_cycle_sp";

        /// Polarity of the rotary encoder.
        ///
        /// The driver sets this correctly, it only needs changing for
        /// unsupported devices.
        read_write encoder_polarity, set_encoder_polarity: Polarity = "encoder_polarity";

        /// Polarity of the motor.
        read_write polarity, set_polarity: Polarity = "polarity";

        /// Name of the port this motor is connected to.
        read port_name: String = "port_name";

        /// Current position of the motor in tacho counts.
        ///
        /// Writing sets the current position.
        read_write position, set_position: i32 = "position";

        /// Proportional constant of the position hold PID.
        read_write position_p, set_position_p: i32 = "hold_pid/Kp";

        /// Integral constant of the position hold PID.
        read_write position_i, set_position_i: i32 = "hold_pid/Ki";

        /// Derivative constant of the position hold PID.
        read_write position_d, set_position_d: i32 = "hold_pid/Kd";

        /// Target position for `run-to-abs-pos` and `run-to-rel-pos`, in
        /// tacho counts.
        read_write position_sp, set_position_sp: i32 = "position_sp";

        /// Current motor speed in tacho counts per second.
        read speed: i32 = "speed";

        /// Target speed in tacho counts per second, used when
        /// `speed_regulation` is on.
        read_write speed_sp, set_speed_sp: i32 = "speed_sp";

        /// Milliseconds to ramp from 0 to 100% duty cycle.
        read_write ramp_up_sp, set_ramp_up_sp: i32 = "ramp_up_sp";

        /// Milliseconds to ramp from 100% duty cycle to 0.
        read_write ramp_down_sp, set_ramp_down_sp: i32 = "ramp_down_sp";

        /// Whether speed regulation is on.
        read_write speed_regulation, set_speed_regulation: SpeedRegulation = "speed_regulation";

        /// Proportional constant of the speed regulation PID.
        read_write speed_regulation_p, set_speed_regulation_p: i32 = "speed_pid/Kp";

        /// Integral constant of the speed regulation PID.
        read_write speed_regulation_i, set_speed_regulation_i: i32 = "speed_pid/Ki";

        /// Derivative constant of the speed regulation PID.
        read_write speed_regulation_d, set_speed_regulation_d: i32 = "speed_pid/Kd";

        /// Motor state flags, any of `running`, `ramping`, `holding` and
        /// `stalled`.
        read state: ModeSet = "state";

        /// Command used when the motor stops.
        read_write stop_command, set_stop_command: StopCommand = "stop_command";

        /// Stop commands supported by the driver.
        read stop_commands: ModeSet = "stop_commands";

        /// Run time for `run-timed`, in milliseconds.
        read_write time_sp, set_time_sp: i32 = "time_sp";

        /// Run until another command is sent.
        fn run_forever(&self) -> Result<()> {
            self.set_command(MotorCommand::RunForever)
        }

        /// Run to `position_sp`.
        fn run_to_abs_pos(&self) -> Result<()> {
            self.set_command(MotorCommand::RunToAbsPos)
        }

        /// Run to `position` + `position_sp`.
        fn run_to_rel_pos(&self) -> Result<()> {
            self.set_command(MotorCommand::RunToRelPos)
        }

        /// Run for `time_sp` milliseconds.
        fn run_timed(&self) -> Result<()> {
            self.set_command(MotorCommand::RunTimed)
        }

        /// Run at `duty_cycle_sp`.
        fn run_direct(&self) -> Result<()> {
            self.set_command(MotorCommand::RunDirect)
        }

        /// Stop using `stop_command`.
        fn stop(&self) -> Result<()> {
            self.set_command(MotorCommand::Stop)
        }

        /// Reset every parameter to its default, stopping the motor.
        fn reset(&self) -> Result<()> {
            self.set_command(MotorCommand::Reset)
        }

        /// Whether `state` contains `running`.
        fn is_running(&self) -> Result<bool> {
            Ok(self.state()?.contains("running"))
        }
    }
}

attributes! {
    /// Attributes of the `dc-motor` class.
    pub trait DcMotorAttributes: Device {
        /// Sends a command to the motor controller.
        write set_command: DcMotorCommand = "command";

        /// Commands supported by the motor controller.
        read commands: ModeSet = "commands";

        /// Name of the driver that provides this device.
        read driver_name: String = "driver_name";

        /// Current duty cycle of the motor, in percent.
        read duty_cycle: i32 = "duty_cycle";

        /// Duty cycle setpoint, in percent, `-100..=100`.
        read_write duty_cycle_sp, set_duty_cycle_sp: i32 = "duty_cycle_sp";

        /// Polarity of the motor.
        read_write polarity, set_polarity: Polarity = "polarity";

        /// Name of the port this motor is connected to.
        read port_name: String = "port_name";

        /// Milliseconds to ramp from 100% duty cycle to 0.
        read_write ramp_down_sp, set_ramp_down_sp: i32 = "ramp_down_sp";

        /// Milliseconds to ramp from 0 to 100% duty cycle.
        read_write ramp_up_sp, set_ramp_up_sp: i32 = "ramp_up_sp";

        /// Motor state flags, `running` and `ramping`.
        read state: ModeSet = "state";

        /// Command used when the motor stops.
        write set_stop_command: DcStopCommand = "stop_command";

        /// Stop commands supported by the driver.
        read stop_commands: ModeSet = "stop_commands";

        /// Run until another command is sent.
        fn run_forever(&self) -> Result<()> {
            self.set_command(DcMotorCommand::RunForever)
        }

        /// Run for `time_sp` milliseconds.
        fn run_timed(&self) -> Result<()> {
            self.set_command(DcMotorCommand::RunTimed)
        }

        /// Stop using `stop_command`.
        fn stop(&self) -> Result<()> {
            self.set_command(DcMotorCommand::Stop)
        }
    }
}

attributes! {
    /// Attributes of the `servo-motor` class.
    pub trait ServoMotorAttributes: Device {
        /// Sends a command to the servo.
        write set_command: ServoCommand = "command";

        /// Name of the driver that provides this device.
        read driver_name: String = "driver_name";

        /// Pulse width for the maximum position, in milliseconds.
        ///
        /// Typically 2400, valid range `2300..=2700`.
        read_write max_pulse_sp, set_max_pulse_sp: i32 = "max_pulse_sp";

        /// Pulse width for the mid position, in milliseconds.
        ///
        /// Typically 1500, valid range `1300..=1700`. For continuous rotation
        /// servos this is the stop point.
        read_write mid_pulse_sp, set_mid_pulse_sp: i32 = "mid_pulse_sp";

        /// Pulse width for the minimum position, in milliseconds.
        ///
        /// Typically 600, valid range `300..=700`.
        read_write min_pulse_sp, set_min_pulse_sp: i32 = "min_pulse_sp";

        /// Polarity of the servo.
        read_write polarity, set_polarity: Polarity = "polarity";

        /// Name of the port this servo is connected to.
        read port_name: String = "port_name";

        /// Target position, `-100..=100`, scaled between the pulse
        /// setpoints.
        read_write position_sp, set_position_sp: i32 = "position_sp";

        /// Milliseconds to move 90 degrees.
        ///
        /// Unsupported by some servo controllers.
        read_write rate_sp, set_rate_sp: i32 = "rate_sp";

        /// Servo state flags, `running` when powered.
        read state: ModeSet = "state";

        /// Drive the servo to `position_sp`.
        fn run(&self) -> Result<()> {
            self.set_command(ServoCommand::Run)
        }

        /// Remove power from the servo.
        fn float(&self) -> Result<()> {
            self.set_command(ServoCommand::Float)
        }
    }
}

device! {
    /// Any `tacho-motor` device
    pub struct TachoMotor {
        class: "tacho-motor",
        pattern: "motor*",
        drivers: [],
        attributes: [TachoMotorAttributes],
    }
}

device! {
    /// EV3 large servo motor
    pub struct LargeMotor {
        class: "tacho-motor",
        pattern: "motor*",
        drivers: ["lego-ev3-l-motor"],
        attributes: [TachoMotorAttributes],
    }
}

device! {
    /// EV3 medium servo motor
    pub struct MediumMotor {
        class: "tacho-motor",
        pattern: "motor*",
        drivers: ["lego-ev3-m-motor"],
        attributes: [TachoMotorAttributes],
    }
}

device! {
    /// Any `dc-motor` device, such as RCX or Power Functions motors
    pub struct DcMotor {
        class: "dc-motor",
        pattern: "motor*",
        drivers: [],
        attributes: [DcMotorAttributes],
    }
}

device! {
    /// Any `servo-motor` device
    pub struct ServoMotor {
        class: "servo-motor",
        pattern: "motor*",
        drivers: [],
        attributes: [ServoMotorAttributes],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::DeviceError, registry::Port, testing::FakeSysfs};

    type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

    #[test]
    fn run_forever() -> Result<()> {
        let sys = FakeSysfs::new();
        let path = sys.tacho_motor("motor0");
        let motor = TachoMotor::new(sys.registry(), Port::Auto)?;

        assert!(motor.path().ends_with("motor0"));
        motor.set_command(MotorCommand::RunForever)?;
        assert_eq!(sys.read(&path, "command"), "run-forever");
        motor.stop()?;
        assert_eq!(sys.read(&path, "command"), "stop");
        Ok(())
    }

    #[test]
    fn tacho_attributes() -> Result<()> {
        let sys = FakeSysfs::new();
        let path = sys.tacho_motor("motor0");
        let motor = TachoMotor::new(sys.registry(), Port::Auto)?;

        assert_eq!(motor.count_per_rot()?, 360);
        assert_eq!(motor.driver_name()?, "lego-ev3-l-motor");
        assert_eq!(motor.port_name()?, "outA");
        assert!(motor.commands()?.contains("run-direct"));
        assert_eq!(motor.stop_commands()?.len(), 3);
        assert_eq!(motor.polarity()?, Polarity::Normal);
        assert_eq!(motor.speed_regulation()?, SpeedRegulation::Off);
        assert_eq!(motor.speed_regulation_p()?, 1000);
        assert!(!motor.is_running()?);

        motor.set_polarity(Polarity::Inversed)?;
        motor.set_stop_command(StopCommand::Hold)?;
        motor.set_position_p(80)?;
        motor.set_time_sp(1500)?;
        assert_eq!(motor.polarity()?, Polarity::Inversed);
        assert_eq!(motor.stop_command()?, StopCommand::Hold);
        assert_eq!(sys.read(&path, "hold_pid/Kp"), "80");
        assert_eq!(motor.time_sp()?, 1500);

        std::fs::write(path.join("state"), "running ramping\n")?;
        assert!(motor.is_running()?);
        Ok(())
    }

    #[test]
    fn bad_token() {
        assert!(matches!(
            "sideways".parse::<Polarity>(),
            Err(DeviceError::InvalidValue { .. })
        ));
        assert_eq!("inversed".parse::<Polarity>().ok(), Some(Polarity::Inversed));
        assert_eq!(MotorCommand::RunToRelPos.to_string(), "run-to-rel-pos");
    }

    #[test]
    fn unknown_token_from_driver() -> Result<()> {
        let sys = FakeSysfs::new();
        let path = sys.tacho_motor("motor0");
        let motor = TachoMotor::new(sys.registry(), Port::Auto)?;

        std::fs::write(path.join("polarity"), "sideways\n")?;
        assert!(matches!(motor.polarity(), Err(DeviceError::Parse { .. })));
        Ok(())
    }

    #[test]
    fn by_driver() -> Result<()> {
        let sys = FakeSysfs::new();
        sys.tacho_motor("motor0");
        let medium = sys.tacho_motor("motor1");
        std::fs::write(medium.join("driver_name"), "lego-ev3-m-motor\n")?;
        let reg = sys.registry();

        let m = MediumMotor::new(reg, Port::Auto)?;
        assert_eq!(m.path(), medium);
        let l = LargeMotor::new(reg, Port::Auto)?;
        assert!(l.path().ends_with("motor0"));
        assert!(matches!(
            LargeMotor::new(reg, Port::Auto),
            Err(DeviceError::DeviceNotFound { .. })
        ));
        Ok(())
    }

    #[test]
    fn by_port() -> Result<()> {
        let sys = FakeSysfs::new();
        sys.tacho_motor("motor0");
        let b = sys.tacho_motor("motor1");
        std::fs::write(b.join("port_name"), "outB\n")?;

        let motor = TachoMotor::new(sys.registry(), Port::connected(crate::registry::OUTPUT_B))?;
        assert_eq!(motor.path(), b);
        let motor = TachoMotor::new(sys.registry(), Port::name("motor0"))?;
        assert_eq!(motor.port_name()?, "outA");
        Ok(())
    }

    #[test]
    fn dc_motor() -> Result<()> {
        let sys = FakeSysfs::new();
        let path = sys.device(
            "dc-motor",
            "motor0",
            &[
                ("command", ""),
                ("duty_cycle_sp", "0"),
                ("stop_command", ""),
                ("stop_commands", "coast brake"),
            ],
        );
        let motor = DcMotor::new(sys.registry(), Port::Auto)?;

        motor.set_duty_cycle_sp(75)?;
        motor.set_stop_command(DcStopCommand::Brake)?;
        motor.run_timed()?;
        assert_eq!(sys.read(&path, "duty_cycle_sp"), "75");
        assert_eq!(sys.read(&path, "stop_command"), "brake");
        assert_eq!(sys.read(&path, "command"), "run-timed");
        assert!(matches!(
            motor.get_attribute("stop_command"),
            Err(DeviceError::AttributeUnavailable { .. })
        ));
        assert!(matches!(
            motor.set_attribute("stop_command", "hold"),
            Err(DeviceError::InvalidValue { .. })
        ));
        Ok(())
    }

    #[test]
    fn servo_motor() -> Result<()> {
        let sys = FakeSysfs::new();
        let path = sys.device(
            "servo-motor",
            "motor0",
            &[("command", ""), ("position_sp", "0"), ("mid_pulse_sp", "1500")],
        );
        let servo = ServoMotor::new(sys.registry(), Port::Auto)?;

        assert_eq!(servo.mid_pulse_sp()?, 1500);
        servo.set_position_sp(-50)?;
        servo.run()?;
        assert_eq!(sys.read(&path, "position_sp"), "-50");
        assert_eq!(sys.read(&path, "command"), "run");
        servo.float()?;
        assert_eq!(sys.read(&path, "command"), "float");
        assert!(matches!(
            servo.rate_sp(),
            Err(DeviceError::AttributeUnavailable { .. })
        ));
        Ok(())
    }

    #[test]
    fn tables() {
        let spec = TachoMotor::spec("speed_pid/Kp").map(|s| s.access);
        assert_eq!(spec, Some(crate::attribute::Access::ReadWrite));
        assert!(TachoMotor::spec("speed").is_some());
        assert!(TachoMotor::spec("rate_sp").is_none());
        assert!(ServoMotor::spec("rate_sp").is_some());
        assert_eq!(<TachoMotor as TachoMotorAttributes>::ATTRIBUTES.len(), 26);
    }
}
